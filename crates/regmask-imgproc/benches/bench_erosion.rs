use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use regmask_image::Mask;
use regmask_imgproc::morphology::{erode, Kernel, KernelShape};

fn bench_erosion(c: &mut Criterion) {
    let mut group = c.benchmark_group("Erosion");

    for (width, height) in [(256, 224), (512, 448), (1024, 896)].iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let data = (0..(*width * *height))
            .map(|idx| u8::from((idx % *width) > 8 && (idx / *width) > 8))
            .collect();
        let mask = Mask::new([*width, *height].into(), data).unwrap();

        for radius in [2, 5, 9] {
            let parameter_string = format!("{}x{}_r{}", width, height, radius);
            let kernel = Kernel::new(KernelShape::Ball, radius).unwrap();

            group.bench_with_input(
                BenchmarkId::new("erode_ball", &parameter_string),
                &(&mask, &kernel),
                |b, i| {
                    let (src, kernel) = *i;
                    let mut dst = Mask::from_size_val(src.size(), false);
                    b.iter(|| {
                        black_box(erode(src, &mut dst, kernel)).unwrap();
                    })
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_erosion);
criterion_main!(benches);
