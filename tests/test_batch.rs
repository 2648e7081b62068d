mod common;

use common::*;
use phasesim::batch::{analyze_paths, result_line};
use phasesim::{BoundingBox, RegionDetector};
use serde_json::{Value, json};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_every_path_yields_one_result_in_order() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let first = dir.path().join("first.png");
    let broken = dir.path().join("broken.png");
    let missing = dir.path().join("missing.png");
    let last = dir.path().join("last.png");
    std::fs::write(&first, png_bytes(&black_square_on_white(60)))?;
    std::fs::write(&broken, b"\x89PNG not really")?;
    std::fs::write(&last, png_bytes(&black_square_on_white(40)))?;

    let paths = vec![first, broken, missing, last];
    let results = analyze_paths(paths.clone(), &RegionDetector::new()).await;
    assert_eq!(results.len(), paths.len());

    let first = results[0].as_ref().map_err(|e| anyhow::anyhow!("{:#}", e))?;
    assert_eq!(first.bounding_box, Some(BoundingBox { x: 20, y: 20, width: 60, height: 60 }));
    assert!(results[1].is_err());
    assert!(results[2].is_err());
    let last = results[3].as_ref().map_err(|e| anyhow::anyhow!("{:#}", e))?;
    assert_eq!(*last, RegionDetector::new().detect(&black_square_on_white(40))?);

    let lines: Vec<Value> = results
        .iter()
        .map(|r| serde_json::from_str(&result_line(r)))
        .collect::<Result<_, _>>()?;
    assert_eq!(lines[0]["detected"], json!(true));
    for failed in &lines[1..3] {
        assert_eq!(failed["success"], json!(false));
        assert!(failed["error"].as_str().is_some_and(|msg| !msg.is_empty()));
    }
    assert_eq!(lines[3]["confidence"], json!(0.15));
    Ok(())
}
