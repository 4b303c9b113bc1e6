use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::Vec2;
use std::time::Duration;
use vignette::camera::Camera;
use vignette::picking::{Ray, Raycaster};
use vignette::scene::{shapes, Color, Image, Material, Node, Scene, TextureMap};
use vignette::TextureAnimator;

fn animator_benchmark(c: &mut Criterion) {
    let Ok(mut animator) = TextureAnimator::new(4, 4, 16, Duration::from_millis(55)) else {
        return;
    };
    let mut scene = Scene::new();
    let mut map = TextureMap::new(scene.add_texture(Image::filled(4, 4, [0; 4])));

    c.bench_function("animator_update_and_apply", |b| {
        b.iter(|| {
            animator.update(black_box(Duration::from_micros(16_667)));
            animator.apply(&mut map);
            black_box(map.offset)
        });
    });

    c.bench_function("animator_long_skip", |b| {
        b.iter(|| {
            animator.update(black_box(Duration::from_secs(3_600)));
            black_box(animator.current_tile())
        });
    });
}

fn raycast_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("raycast_sphere");
    for segments in [16_u32, 32, 64] {
        let mut scene = Scene::new();
        let _ = scene.add(
            None,
            Node::mesh(
                shapes::sphere(80.0, segments, segments / 2),
                Material::basic(Color::WHITE),
            ),
        );
        let camera = Camera::default();
        let ray = Ray::from_camera(Vec2::ZERO, &camera);

        group.bench_function(format!("{segments}_segments"), |b| {
            b.iter(|| black_box(Raycaster::new(ray).intersect_scene(&scene).len()));
        });
    }
    group.finish();
}

criterion_group!(benches, animator_benchmark, raycast_benchmark);
criterion_main!(benches);
