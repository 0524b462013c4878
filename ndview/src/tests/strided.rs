use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{Error, StridedView, View};

fn sequence(n: u32) -> Vec<u32> {
    (0..n).collect()
}

#[test]
fn test_identity_section() {
    let data = sequence(120);
    let view = StridedView::from_slice(&data, [10, 3, 4]).unwrap();

    let section = view.section([0, 0, 0], view.shape(), [1, 1, 1]).unwrap();
    assert!(section.same(&view));

    let section = view.section_span(view.full_span(), [1, 1, 1]).unwrap();
    assert!(section.same(&view));
}

#[test]
fn test_negative_step() {
    let data = sequence(120);
    let view = StridedView::from_slice(&data, [10, 3, 4]).unwrap();

    let section = view.section([2, 0, 1], [5, 3, 4], [-1, 1, 2]).unwrap();
    assert_eq!(section.shape(), [3, 3, 2]);
    assert_eq!(section.strides(), [-48, 16, 8]);
    assert_eq!(section.get([0, 0, 0]).unwrap(), view.get([4, 0, 1]).unwrap());
    assert_eq!(section.get([2, 1, 1]).unwrap(), view.get([2, 1, 3]).unwrap());
    assert_eq!(section.start(), view.ptr_at([4, 0, 1]).unwrap());
}

#[test]
fn test_empty_section() {
    let data = sequence(12);
    let view = StridedView::from_slice(&data, [3, 4]).unwrap();

    let section = view.axis_section(1, 2, 2, -3).unwrap();
    assert_eq!(section.shape(), [3, 0]);
    assert_eq!(section.size(), 0);
    assert_eq!(section.iter().count(), 0);
}

#[test]
fn test_slice() {
    let data = sequence(120);
    let view = StridedView::from_slice(&data, [10, 3, 4]).unwrap();

    let slice = view.slice(1, 1).unwrap();
    assert_eq!(slice.shape(), [10, 4]);
    assert_eq!(slice.strides(), [48, 4]);
    assert_eq!(slice.get([2, 3]).unwrap(), view.get([2, 1, 3]).unwrap());

    let point = slice.slice(2, 0).unwrap().slice(3, 0).unwrap();
    assert_eq!(point.value().unwrap(), 2 * 12 + 4 + 3);
    assert_eq!(point.value().unwrap(), view.at([2, 1, 3]).unwrap().value().unwrap());
}

#[test]
fn test_fcall() -> crate::Result<()> {
    let data = sequence(120);
    let view = StridedView::from_slice(&data, [10, 3, 4])?;

    let section = view.fcall().range(2, 5)?.index(1)?.all().into_view();
    assert_eq!(section, view.section([2, 1, 0], [5, 2, 4], [1, 1, 1])?);

    let section = view.fcall().all().all().step_range(0, 4, -2)?.into_view();
    assert_eq!(section.shape(), [10, 3, 2]);
    assert_eq!(section.get([0, 0, 0])?, 3);
    assert_eq!(section.get([0, 0, 1])?, 1);
    Ok(())
}

#[test]
fn test_errors() {
    let data = sequence(120);
    let view = StridedView::from_slice(&data, [10, 3, 4]).unwrap();

    assert_eq!(
        view.get([10, 0, 0]),
        Err(Error::OutOfRange {
            axis: 0,
            index: 10,
            extent: 10
        })
    );

    assert_eq!(
        view.axis_section(2, 1, 5, 1),
        Err(Error::SectionOutOfRange {
            axis: 2,
            start: 1,
            end: 5,
            extent: 4
        })
    );

    assert_eq!(view.axis_section(1, 0, 3, 0), Err(Error::ZeroStep { axis: 1 }));
    assert_eq!(view.slice(0, 3), Err(Error::AxisOutOfRange { axis: 3, ndim: 3 }));
    assert_eq!(
        view.slice(-1, 0).map(|v| v.shape()),
        Err(Error::OutOfRange {
            axis: 0,
            index: -1,
            extent: 10
        })
    );

    assert!(matches!(
        StridedView::from_slice(&data, [10, 3, 5]),
        Err(Error::BufferTooSmall { .. })
    ));

    assert_eq!(
        StridedView::from_slice(&data, [10, -3, 4]),
        Err(Error::NegativeExtent {
            axis: 1,
            extent: -3
        })
    );
}

#[test]
fn test_null() {
    let view = StridedView::<u32, [isize; 2]>::null();
    assert!(view.is_null());
    assert_eq!(view.size(), 0);
    assert_eq!(view.get([0, 0]), Err(Error::NullView));
    assert_eq!(view.axis_section(0, 0, 0, 1), Err(Error::NullView));
    assert_eq!(view.iter().count(), 0);
    assert_eq!(view, StridedView::<u32, [isize; 2]>::null());

    let data = sequence(4);
    let other = StridedView::from_slice(&data, [2, 2]).unwrap();
    assert_eq!(view.compare(&other), Err(Error::NullView));
    assert_ne!(view, other);
}

#[test]
fn test_set_and_assign() {
    let data = sequence(6);
    let mut out = vec![0u32; 6];

    {
        let source = StridedView::from_slice(&data, [2, 3]).unwrap();
        let reversed = source.section([0, 0], [2, 3], [-1, -1]).unwrap();

        let target = StridedView::from_mut_slice(&mut out, [2, 3]).unwrap();
        target.assign(&reversed).unwrap();
        assert!(target.compare(&reversed).unwrap());
        assert_ne!(target, source);

        target.set([0, 1], 42).unwrap();
        assert_eq!(target.get([0, 1]).unwrap(), 42);
    }

    assert_eq!(out, [5, 42, 3, 2, 1, 0]);
}

#[test]
fn test_shape_mismatch() {
    let data = sequence(6);
    let mut out = vec![0u32; 6];

    let source = StridedView::from_slice(&data, [3, 2]).unwrap();
    let target = StridedView::from_mut_slice(&mut out, [2, 3]).unwrap();

    assert_eq!(
        target.assign(&source),
        Err(Error::ShapeMismatch {
            left: vec![2, 3],
            right: vec![3, 2],
        })
    );
}

#[test]
fn test_default_strides_padding() {
    let data = sequence(24);
    let strides = StridedView::<u32, [isize; 2]>::default_strides([3, 4], 4);
    assert_eq!(strides, [32, 8]);

    // SAFETY: the furthest element is at byte 2 * 32 + 3 * 8, within the 96
    // bytes of the buffer.
    let padded = unsafe {
        StridedView::<u32, [isize; 2]>::new_unchecked(data.as_ptr() as *mut u32, [3, 4], strides)
            .unwrap()
    };

    assert_eq!(padded.default_strides_padding(0), Some(4));
    assert!(padded.has_default_strides(0));
    assert!(!padded.has_default_strides_without_padding(0));
    assert_eq!(padded.get([1, 1]).unwrap(), 10);

    let view = StridedView::from_slice(&data, [2, 3, 4]).unwrap();
    assert!(view.has_default_strides_without_padding(0));

    let sparse = view.axis_section(1, 0, 3, 2).unwrap();
    assert!(!sparse.has_default_strides(0));
    assert!(sparse.has_default_strides(2));
}

#[test]
fn test_reset() {
    let data = sequence(12);
    let view = StridedView::from_slice(&data, [3, 4]).unwrap();

    let mut section = view.section([1, 1], [2, 3], [1, 1]).unwrap();
    assert!(!section.same(&view));
    section.reset(view);
    assert!(section.same(&view));
}

#[test]
fn test_random_sections() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    let data = sequence(6 * 5 * 7);
    let view = StridedView::from_slice(&data, [6, 5, 7]).unwrap();

    for _ in 0..64 {
        let mut section = view;
        // Raw coordinates reached by every logical index, per axis.
        let mut maps = [(0..6).collect::<Vec<_>>(), (0..5).collect(), (0..7).collect()];

        for _ in 0..3 {
            let axis = rng.gen_range(0..3);
            let extent = maps[axis].len() as isize;
            let start = rng.gen_range(0..=extent);
            let end = rng.gen_range(start..=extent);
            let mut step = rng.gen_range(1..=3);

            if rng.gen() {
                step = -step;
            }

            section = section.axis_section(axis, start, end, step).unwrap();

            let indices: Vec<isize> = if step < 0 {
                (start..end).rev().step_by(step.unsigned_abs()).collect()
            } else {
                (start..end).step_by(step.unsigned_abs()).collect()
            };

            let mapped = indices.iter().map(|&i| maps[axis][i as usize]).collect();
            maps[axis] = mapped;
        }

        let shape = section.shape();
        assert_eq!(shape, [0, 1, 2].map(|axis| maps[axis].len() as isize));

        for [a, b, c] in section.indices() {
            let raw = [maps[0][a as usize], maps[1][b as usize], maps[2][c as usize]];
            assert_eq!(section.get([a, b, c]).unwrap(), view.get(raw).unwrap());
        }
    }
}
