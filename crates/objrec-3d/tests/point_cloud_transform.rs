use approx::assert_relative_eq;
use objrec_3d::{
    reconstruction::{point_cloud_transform, PointCloudTransformInput},
    transforms::{axis_angle_to_rotation_matrix, RigidTransform},
};
use objrec_image::{Image, ImageError, ImageSize};

struct Frame {
    image: Image<u8, 3>,
    mask: Image<u8, 1>,
    points3d: Image<f64, 3>,
}

// mask pattern: every third pixel plus the whole first row
fn make_frame(size: ImageSize) -> Result<Frame, ImageError> {
    let n = size.num_pixels();
    let points = (0..n)
        .flat_map(|i| {
            let (y, x) = ((i / size.width) as f64, (i % size.width) as f64);
            [0.01 * x - 0.5, 0.01 * y - 0.4, 1.0 + 0.001 * (x + y)]
        })
        .collect::<Vec<_>>();
    let colors = (0..n)
        .flat_map(|i| [(i % 251) as u8, (i % 13) as u8, (i % 7) as u8])
        .collect::<Vec<_>>();
    let mask = (0..n)
        .map(|i| if i % 3 == 0 || i < size.width { 255 } else { 0 })
        .collect::<Vec<_>>();

    Ok(Frame {
        image: Image::new(size, colors)?,
        mask: Image::new(size, mask)?,
        points3d: Image::new(size, points)?,
    })
}

#[test]
fn test_view_size_matches_mask_count() -> Result<(), Box<dyn std::error::Error>> {
    let frame = make_frame(ImageSize {
        width: 64,
        height: 48,
    })?;
    let rotation = axis_angle_to_rotation_matrix(&[0.0, 1.0, 0.0], 0.4)?;
    let input = PointCloudTransformInput {
        rotation: &rotation,
        translation: &[0.1, 0.2, 1.5],
        image: &frame.image,
        mask: &frame.mask,
        points3d: &frame.points3d,
    };

    let output = point_cloud_transform(&input)?;
    let num_valid = frame.mask.as_slice().iter().filter(|&&m| m != 0).count();
    assert_eq!(output.view.len(), num_valid);
    assert_eq!(output.view.num_finite(), num_valid);
    Ok(())
}

#[test]
fn test_colors_preserved_in_scan_order() -> Result<(), Box<dyn std::error::Error>> {
    let frame = make_frame(ImageSize {
        width: 32,
        height: 16,
    })?;
    let rotation = axis_angle_to_rotation_matrix(&[1.0, 1.0, 0.0], -0.9)?;
    let input = PointCloudTransformInput {
        rotation: &rotation,
        translation: &[0.0, 0.0, 0.7],
        image: &frame.image,
        mask: &frame.mask,
        points3d: &frame.points3d,
    };

    let output = point_cloud_transform(&input)?;
    let expected = frame
        .image
        .pixels()
        .zip(frame.mask.as_slice())
        .filter(|&(_, &m)| m != 0)
        .map(|(c, _)| [c[0], c[1], c[2]])
        .collect::<Vec<_>>();
    assert_eq!(output.view.colors(), expected.as_slice());
    Ok(())
}

#[test]
fn test_roundtrip_recovers_camera_points() -> Result<(), Box<dyn std::error::Error>> {
    let frame = make_frame(ImageSize {
        width: 20,
        height: 10,
    })?;
    let rotation = axis_angle_to_rotation_matrix(&[0.2, -0.7, 0.4], 2.3)?;
    let translation = [-0.3, 0.05, 0.9];
    let input = PointCloudTransformInput {
        rotation: &rotation,
        translation: &translation,
        image: &frame.image,
        mask: &frame.mask,
        points3d: &frame.points3d,
    };

    let view = point_cloud_transform(&input)?.view;
    let back = view.transform(&RigidTransform::from_rt(&rotation, &translation, false))?;

    let expected = frame
        .points3d
        .pixels()
        .zip(frame.mask.as_slice())
        .filter(|&(_, &m)| m != 0)
        .map(|(p, _)| p)
        .collect::<Vec<_>>();
    assert_eq!(back.len(), expected.len());
    for (p, e) in back.points().iter().zip(expected) {
        for i in 0..3 {
            assert_relative_eq!(p[i], e[i], epsilon = 1e-9);
        }
    }
    Ok(())
}

#[test]
fn test_deterministic_output() -> Result<(), Box<dyn std::error::Error>> {
    let frame = make_frame(ImageSize {
        width: 40,
        height: 30,
    })?;
    let rotation = axis_angle_to_rotation_matrix(&[0.0, 0.0, 1.0], 0.25)?;
    let input = PointCloudTransformInput {
        rotation: &rotation,
        translation: &[1.0, -1.0, 0.5],
        image: &frame.image,
        mask: &frame.mask,
        points3d: &frame.points3d,
    };

    let first = point_cloud_transform(&input)?;
    let second = point_cloud_transform(&input)?;

    let bits = |pts: &[[f64; 3]]| {
        pts.iter()
            .map(|p| p.map(f64::to_bits))
            .collect::<Vec<_>>()
    };
    assert_eq!(bits(first.view.points()), bits(second.view.points()));
    assert_eq!(first.view.colors(), second.view.colors());
    Ok(())
}

#[test]
fn test_empty_mask_gives_empty_view() -> Result<(), Box<dyn std::error::Error>> {
    let mut frame = make_frame(ImageSize {
        width: 8,
        height: 8,
    })?;
    frame.mask.as_slice_mut().fill(0);
    let rotation = axis_angle_to_rotation_matrix(&[1.0, 0.0, 0.0], 0.1)?;
    let input = PointCloudTransformInput {
        rotation: &rotation,
        translation: &[0.0, 0.0, 1.0],
        image: &frame.image,
        mask: &frame.mask,
        points3d: &frame.points3d,
    };

    let output = point_cloud_transform(&input)?;
    assert!(output.view.is_empty());
    Ok(())
}

#[test]
fn test_non_finite_points_pass_through() -> Result<(), Box<dyn std::error::Error>> {
    let mut frame = make_frame(ImageSize {
        width: 4,
        height: 2,
    })?;
    // pixel 0 is masked in, pixel 1 is masked out
    frame.points3d.as_slice_mut()[2] = f64::NAN;
    frame.points3d.as_slice_mut()[5] = f64::NAN;
    frame.mask.as_slice_mut()[1] = 0;

    let input = PointCloudTransformInput {
        rotation: &RigidTransform::identity().rotation,
        translation: &[0.0, 0.0, 1.0],
        image: &frame.image,
        mask: &frame.mask,
        points3d: &frame.points3d,
    };

    let output = point_cloud_transform(&input)?;
    let num_valid = frame.mask.as_slice().iter().filter(|&&m| m != 0).count();
    assert_eq!(output.view.len(), num_valid);
    assert!(output.view.points()[0][2].is_nan());
    assert_eq!(output.view.num_finite(), num_valid - 1);
    Ok(())
}
