mod common;

use common::*;
use phasesim::{DetectionResult, RegionDetector};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_requests_match_sequential() -> anyhow::Result<()> {
    let sides = [20u32, 30, 40, 50, 60, 70, 80, 0];
    let detector = RegionDetector::new();

    let expected: Vec<DetectionResult> = sides
        .iter()
        .map(|&side| detector.detect(&input_for(side)))
        .collect::<anyhow::Result<_>>()?;

    let handles: Vec<_> = sides
        .iter()
        .map(|&side| {
            let detector = detector.clone();
            tokio::task::spawn_blocking(move || detector.detect(&input_for(side)))
        })
        .collect();

    for (handle, expected) in handles.into_iter().zip(expected) {
        assert_eq!(handle.await??, expected);
    }
    Ok(())
}

fn input_for(side: u32) -> image::DynamicImage {
    if side == 0 {
        solid(100, 100, WHITE)
    } else {
        black_square_on_white(side)
    }
}
