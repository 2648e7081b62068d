use image::{GrayImage, ImageBuffer, Luma};
use imageproc::region_labelling::{connected_components, Connectivity};
use std::collections::HashSet;

use crate::detection::threshold::{BACKGROUND, FOREGROUND};
use crate::models::Contour;

type LabelImage = ImageBuffer<Luma<u32>, Vec<u32>>;

/// Neighbour offsets in clockwise order (y grows downwards), starting east
const DIRECTIONS: [(i64, i64); 8] = [
    (1, 0), (1, 1), (0, 1), (-1, 1),
    (-1, 0), (-1, -1), (0, -1), (1, -1),
];
const WEST: usize = 4;

/// Find the outer boundary of every 8-connected foreground region.
///
/// Regions that sit inside a hole of another region are not reported, and
/// holes themselves are never traced. Contours come back in raster order of
/// their first pixel.
pub fn find_external_contours(mask: &GrayImage) -> Vec<Contour> {
    let labels = connected_components(mask, Connectivity::Eight, Luma([BACKGROUND]));
    let (background, frame_labels) = background_regions(mask);

    let mut seen = HashSet::new();
    let mut contours = Vec::new();

    for (x, y, label) in labels.enumerate_pixels() {
        let label = label[0];
        if label == 0 || !seen.insert(label) {
            continue;
        }
        // First pixel of a region in raster order: the pixel above it is
        // background, and it is outside exactly when the region is external
        if y > 0 && !frame_labels.contains(&background.get_pixel(x, y - 1)[0]) {
            continue;
        }
        contours.push(Contour::new(trace_boundary(&labels, label, (x, y))));
    }

    contours
}

/// 4-connected background labels, and the labels of regions touching the frame
fn background_regions(mask: &GrayImage) -> (LabelImage, HashSet<u32>) {
    let (width, height) = mask.dimensions();
    let inverted = GrayImage::from_fn(width, height, |x, y| {
        Luma([if mask.get_pixel(x, y)[0] == BACKGROUND { FOREGROUND } else { BACKGROUND }])
    });
    let labels = connected_components(&inverted, Connectivity::Four, Luma([BACKGROUND]));

    let frame_labels = labels
        .enumerate_pixels()
        .filter(|(x, y, label)| {
            label[0] != 0 && (*x == 0 || *y == 0 || *x == width - 1 || *y == height - 1)
        })
        .map(|(_, _, label)| label[0])
        .collect();

    (labels, frame_labels)
}

/// Moore-neighbour tracing of one region's outer boundary, clockwise from
/// its first raster pixel. Stops when the start pixel is about to repeat
/// its first move.
fn trace_boundary(labels: &LabelImage, label: u32, start: (u32, u32)) -> Vec<(u32, u32)> {
    let mut points = vec![start];

    // Nothing lies west of the first raster pixel
    let Some((second, first_dir)) = next_clockwise(labels, label, start, WEST) else {
        return points;
    };

    let max_steps = 8 * labels.width() as usize * labels.height() as usize;
    let (mut current, mut dir) = (second, first_dir);

    for _ in 0..max_steps {
        let back = (dir + 4) % 8;
        let Some((next, next_dir)) = next_clockwise(labels, label, current, back) else {
            break;
        };
        if current == start && next == second {
            break;
        }
        points.push(current);
        current = next;
        dir = next_dir;
    }

    points
}

/// First neighbour of `p` in the region, scanning clockwise after `from_dir`
fn next_clockwise(
    labels: &LabelImage,
    label: u32,
    p: (u32, u32),
    from_dir: usize,
) -> Option<((u32, u32), usize)> {
    (1..=8)
        .map(|k| (from_dir + k) % 8)
        .find_map(|d| neighbor(labels, label, p, d).map(|q| (q, d)))
}

fn neighbor(labels: &LabelImage, label: u32, p: (u32, u32), dir: usize) -> Option<(u32, u32)> {
    let (dx, dy) = DIRECTIONS[dir];
    let x = p.0 as i64 + dx;
    let y = p.1 as i64 + dy;
    if x < 0 || y < 0 || x >= labels.width() as i64 || y >= labels.height() as i64 {
        return None;
    }
    let q = (x as u32, y as u32);
    (labels.get_pixel(q.0, q.1)[0] == label).then_some(q)
}

/// Contour enclosing the largest polygon area; earliest wins ties
pub fn largest_contour(contours: &[Contour]) -> Option<&Contour> {
    contours.iter().fold(None, |best: Option<&Contour>, c| match best {
        Some(b) if b.area() >= c.area() => Some(b),
        _ => Some(c),
    })
}
