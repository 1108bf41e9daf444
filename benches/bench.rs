use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rebound::{narrow::poly_poly, *};

fn pile(count: usize) -> World {
   let mut world = World::new(WorldConfig { gravity: Vec2::new(0.0, -100.0), ..Default::default() }).unwrap();
   world.add_poly(Transform::at(Vec2::new(0.0, -5.0)), Material::default(), Motion::default(), Fp::INFINITY, Poly::rect(200.0, 5.0)).unwrap();
   for i in 0..count {
      let x = (i % 20) as Fp * 4.0 - 40.0;
      let y = (i / 20) as Fp * 4.0 + 2.0;
      if i % 2 == 0 {
         world.add_circle(Transform::at(Vec2::new(x, y)), Material::default(), Motion::default(), 1.0, 1.5).unwrap();
      } else {
         world.add_poly(Transform::new(Vec2::new(x, y), 0.3), Material::default(), Motion::default(), 1.0, Poly::regular(5, 1.5).unwrap()).unwrap();
      }
   }
   world
}

fn criterion_benchmark(c: &mut Criterion) {
   let config = NarrowConfig::default();
   let square = Poly::rect(0.5, 0.5);
   let hex = Poly::regular(6, 0.6).unwrap();
   c.bench_function("poly poly sat", |b| b.iter(|| poly_poly(
      black_box(&Transform::default()), black_box(&square),
      black_box(&Transform::new(Vec2::new(0.8, 0.3), 0.4)), black_box(&hex),
      &config)));

   let settled = {
      let mut world = pile(100);
      for _ in 0..100 {
         world.step();
      }
      world
   };
   c.bench_function("step 100 bodies", |b| b.iter_batched(
      || settled.clone(),
      |mut world| world.step(),
      criterion::BatchSize::SmallInput));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
