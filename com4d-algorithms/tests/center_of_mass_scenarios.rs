#![allow(clippy::float_cmp, clippy::cast_precision_loss)]
use approx::assert_abs_diff_eq;
use com4d_algorithms::{CenterOfMass, PixelSelection};
use com4d_core::cache::flatten_detector_axes;
use com4d_core::region::{Graphic, MaskRegion};
use com4d_core::{DataAndMetadata, DataCache, DataItem, ItemId};
use ndarray::{ArrayD, Dimension, IxDyn};

fn scan(shape: [usize; 4], f: impl Fn(&[usize]) -> f32) -> ArrayD<f32> {
    ArrayD::from_shape_fn(IxDyn(&shape), |index| f(index.slice()))
}

fn item(data: ArrayD<f32>) -> DataItem {
    DataItem::new(ItemId::new(1), "Scan", DataAndMetadata::from_data(data))
}

#[test]
fn test_all_ones_full_frame_is_grid_mean() {
    let source = item(scan([2, 2, 3, 3], |_| 1.0));
    let mut cache = DataCache::detector_flattening();
    let data = cache.get_cached_data(&source).unwrap();

    let com = CenterOfMass::new()
        .compute(data.view(), (3, 3), std::iter::empty())
        .unwrap();

    assert_eq!(com.dim(), (2, 2, 2));
    for value in &com {
        assert_eq!(*value, 1.0);
    }
}

#[test]
fn test_single_pixel_mask_ignores_intensity() {
    // Intensity varies across scan positions and detector pixels.
    let data = scan([3, 2, 4, 4], |i| 1.0 + (i[0] * 7 + i[1] * 3 + i[2] * 5 + i[3]) as f32);
    let flat = flatten_detector_axes(&data).unwrap();
    let region = Graphic::rectangle(((0.5, 0.25), (0.25, 0.25)));
    let regions: Vec<&dyn MaskRegion> = vec![&region];

    let com = CenterOfMass::new()
        .compute(flat.view(), (4, 4), regions)
        .unwrap();

    for iy in 0..3 {
        for ix in 0..2 {
            assert_eq!(com[[0, iy, ix]], 2.0);
            assert_eq!(com[[1, iy, ix]], 1.0);
        }
    }
}

#[test]
fn test_full_frame_normalizes_both_planes() {
    // det 2x2 weights [[1, 2], [3, 4]]: y = 7/10, x = 6/10
    let data = scan([1, 1, 2, 2], |i| (i[2] * 2 + i[3] + 1) as f32);
    let flat = flatten_detector_axes(&data).unwrap();

    let com = CenterOfMass::new()
        .compute(flat.view(), (2, 2), std::iter::empty())
        .unwrap();

    assert_abs_diff_eq!(com[[0, 0, 0]], 0.7, epsilon = 1e-6);
    assert_abs_diff_eq!(com[[1, 0, 0]], 0.6, epsilon = 1e-6);
}

#[test]
fn test_all_false_mask_matches_full_frame() {
    let data = scan([2, 3, 4, 5], |i| ((i[0] + 1) * (i[2] + 2) + i[1] * i[3]) as f32);
    let flat = flatten_detector_axes(&data).unwrap();
    let empty_region = Graphic::rectangle(((0.5, 0.5), (0.0, 0.0)));
    let regions: Vec<&dyn MaskRegion> = vec![&empty_region];

    let algo = CenterOfMass::new();
    let with_empty_region = algo.compute(flat.view(), (4, 5), regions).unwrap();
    let without_regions = algo
        .compute(flat.view(), (4, 5), std::iter::empty())
        .unwrap();

    assert_eq!(with_empty_region, without_regions);
}

#[test]
fn test_union_of_regions() {
    // Two single-pixel regions with equal weight: midpoint.
    let data = scan([1, 1, 4, 4], |_| 2.0);
    let flat = flatten_detector_axes(&data).unwrap();
    let a = Graphic::point(0.0, 0.0);
    let b = Graphic::point(0.75, 0.75);
    let regions: Vec<&dyn MaskRegion> = vec![&a, &b];

    let com = CenterOfMass::new()
        .compute(flat.view(), (4, 4), regions)
        .unwrap();

    assert_eq!(com[[0, 0, 0]], 1.5);
    assert_eq!(com[[1, 0, 0]], 1.5);
}

#[test]
fn test_repeated_compute_is_bit_identical() {
    let source = item(scan([4, 3, 6, 5], |i| {
        ((i[0] * 31 + i[1] * 17 + i[2] * 13 + i[3] * 7) % 11) as f32 + 0.25
    }));
    let region = Graphic::ellipse(((0.1, 0.2), (0.6, 0.5)));
    let regions: Vec<&dyn MaskRegion> = vec![&region];
    let mut cache = DataCache::detector_flattening();
    let algo = CenterOfMass::new();

    let first = {
        let data = cache.get_cached_data(&source).unwrap();
        algo.compute(data.view(), (6, 5), regions.iter().copied())
            .unwrap()
    };
    let second = {
        let data = cache.get_cached_data(&source).unwrap();
        algo.compute(data.view(), (6, 5), regions.iter().copied())
            .unwrap()
    };

    assert_eq!(cache.transform_count(), 1);
    let first_bits: Vec<u32> = first.iter().map(|value| value.to_bits()).collect();
    let second_bits: Vec<u32> = second.iter().map(|value| value.to_bits()).collect();
    assert_eq!(first_bits, second_bits);
}

#[test]
fn test_full_frame_selection_covers_every_pixel() {
    let selection = PixelSelection::full_frame((3, 4));
    assert!(selection.is_full_frame());
    assert_eq!(selection.len(), 12);
    assert_eq!(selection.indices().last(), Some(&11));
}
