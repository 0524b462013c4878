use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{wraparound, Error, Indices, StridedView, View, WrapView};

fn ring() -> Vec<u32> {
    (0..120).collect()
}

#[test]
fn test_wraparound() {
    let data = ring();
    let vw = StridedView::from_slice(&data, [10, 3, 4]).unwrap();
    let vw_w1 = wraparound(vw, [-3, 2, 1], [2, 7, 3], [1, 2, -1]).unwrap();

    assert_eq!(vw_w1.shape(), [5, 3, 2]);
    assert_eq!(vw_w1.raw_shape(), [10, 3, 4]);
    assert_eq!(vw_w1.get([0, 0, 0]).unwrap(), vw.get([7, 2, 2]).unwrap());
    assert_eq!(vw_w1.get([1, 0, 0]).unwrap(), vw.get([8, 2, 2]).unwrap());
    assert_eq!(vw_w1.get([0, 1, 0]).unwrap(), vw.get([7, 1, 2]).unwrap());
    assert_eq!(vw_w1.get([0, 0, 1]).unwrap(), vw.get([7, 2, 1]).unwrap());
    assert_eq!(vw_w1.get([4, 2, 1]).unwrap(), vw.get([1, 0, 1]).unwrap());

    let start = vw.ptr_at([7, 2, 2]).unwrap().cast::<u8>();
    assert_eq!(vw_w1.start(), start);
    assert_eq!(vw_w1.physical([3, 1, 0]).unwrap(), [0, 1, 2]);
}

#[test]
fn test_axis_wraps() {
    let data = ring();
    let vw = StridedView::from_slice(&data, [10, 3, 4]).unwrap();
    let vw_w1 = wraparound(vw, [-3, 2, 1], [2, 7, 3], [1, 2, -1]).unwrap();

    assert!(vw_w1.axis_wraps(0).unwrap());
    assert!(vw_w1.axis_wraps(1).unwrap());
    assert!(!vw_w1.axis_wraps(2).unwrap());
    assert_eq!(
        vw_w1.axis_wraps(3),
        Err(Error::AxisOutOfRange { axis: 3, ndim: 3 })
    );

    let identity = WrapView::identity(vw).unwrap();

    for axis in 0..3 {
        assert!(!identity.axis_wraps(axis).unwrap());
    }
}

#[test]
fn test_identity_section() {
    let data = ring();
    let vw = StridedView::from_slice(&data, [10, 3, 4]).unwrap();
    let vw_w1 = wraparound(vw, [-3, 2, 1], [2, 7, 3], [1, 2, -1]).unwrap();

    let section = vw_w1.section([0, 0, 0], vw_w1.shape(), [1, 1, 1]).unwrap();
    assert!(section.same(&vw_w1));
    assert_eq!(section, vw_w1);
}

#[test]
fn test_canonical_triple() {
    let data = ring();
    let vw = StridedView::from_slice(&data, [10, 3, 4]).unwrap();
    let vw_w1 = wraparound(vw, [-3, 2, 1], [2, 7, 3], [1, 2, -1]).unwrap();

    assert_eq!(vw_w1.wrap_origin(), [-3, 2, 2]);
    assert_eq!(vw_w1.wrap_start(), [-3, 2, 1]);
    assert_eq!(vw_w1.wrap_end(), [2, 7, 3]);
    assert_eq!(vw_w1.wrap_steps(), [1, 2, -1]);

    let rebuilt = wraparound(vw, vw_w1.wrap_start(), vw_w1.wrap_end(), vw_w1.wrap_steps()).unwrap();
    assert_eq!(rebuilt, vw_w1);

    // Ends which are not reached by the step are normalized.
    let loose = wraparound(vw, [-3, 2, 1], [2, 8, 3], [1, 2, -1]).unwrap();
    assert_eq!(loose, vw_w1);
}

#[test]
fn test_composed_sections() {
    let data = ring();
    let vw = StridedView::from_slice(&data, [10, 3, 4]).unwrap();
    let vw_w1 = wraparound(vw, [-3, 2, 1], [2, 7, 3], [1, 2, -1]).unwrap();

    let reversed = vw_w1.axis_section(0, 1, 4, -1).unwrap();
    assert_eq!(reversed.shape(), [3, 3, 2]);

    for k in 0..3 {
        assert_eq!(
            reversed.get([k, 1, 1]).unwrap(),
            vw_w1.get([3 - k, 1, 1]).unwrap()
        );
    }

    // Sections may reach past the logical extent, they keep wrapping.
    let past = vw_w1.axis_section(0, 3, 13, 2).unwrap();
    assert_eq!(past.shape(), [5, 3, 2]);
    assert_eq!(past.get([4, 0, 0]).unwrap(), vw.get([8, 2, 2]).unwrap());

    let section = vw_w1.fcall().all().step_range(0, 3, 2).unwrap().into_view();
    assert_eq!(section.shape(), [5, 2, 2]);
    assert_eq!(section.get([0, 1, 0]).unwrap(), vw.get([7, 0, 2]).unwrap());
}

#[test]
fn test_slice() {
    let data = ring();
    let vw = StridedView::from_slice(&data, [10, 3, 4]).unwrap();
    let vw_w1 = wraparound(vw, [-3, 2, 1], [2, 7, 3], [1, 2, -1]).unwrap();

    let frame = vw_w1.slice(4, 0).unwrap();
    assert_eq!(frame.shape(), [3, 2]);
    assert_eq!(frame.base_view().shape(), [3, 4]);
    assert_eq!(frame.get([0, 0]).unwrap(), vw_w1.get([4, 0, 0]).unwrap());
    assert_eq!(frame.get([2, 1]).unwrap(), vw.get([1, 0, 1]).unwrap());

    let point = frame.slice(1, 0).unwrap().slice(0, 0).unwrap();
    assert_eq!(point.size(), 1);
    assert_eq!(point.get([]).unwrap(), vw_w1.get([4, 1, 0]).unwrap());
}

#[test]
fn test_deep_and_shallow_equality() {
    let data = ring();
    let vw = StridedView::from_slice(&data, [10, 3, 4]).unwrap();

    let a = wraparound(vw, [7, 0, 0], [12, 3, 4], [1, 1, 1]).unwrap();
    let b = wraparound(vw, [-3, 0, 0], [2, 3, 4], [1, 1, 1]).unwrap();

    assert!(a.compare(&b).unwrap());
    assert_ne!(a, b);
    assert_eq!(
        a.iter().collect::<Result<Vec<_>, _>>().unwrap(),
        b.iter().collect::<Result<Vec<_>, _>>().unwrap()
    );
}

#[test]
fn test_set() {
    let mut data = ring();

    {
        let vw = StridedView::from_mut_slice(&mut data, [10, 3, 4]).unwrap();
        let vw_w1 = wraparound(vw, [-3, 2, 1], [2, 7, 3], [1, 2, -1]).unwrap();
        vw_w1.set([0, 0, 0], 999).unwrap();
        vw_w1.set([3, 0, 0], 998).unwrap();
    }

    assert_eq!(data[7 * 12 + 2 * 4 + 2], 999);
    assert_eq!(data[2 * 4 + 2], 998);
}

#[test]
fn test_reset() {
    let data = ring();
    let vw = StridedView::from_slice(&data, [10, 3, 4]).unwrap();

    let mut view = wraparound(vw, [-3, 2, 1], [2, 7, 3], [1, 2, -1]).unwrap();
    let identity = WrapView::identity(vw).unwrap();

    view.reset(identity);
    assert!(view.same(&identity));
    assert_eq!(view.get([9, 2, 3]).unwrap(), 119);
}

#[test]
fn test_errors() {
    let data = ring();
    let vw = StridedView::from_slice(&data, [10, 3, 4]).unwrap();

    assert_eq!(
        wraparound(vw, [0, 0, 0], [1, 1, 1], [1, 0, 1]),
        Err(Error::ZeroStep { axis: 1 })
    );

    assert_eq!(
        wraparound(vw, [0, 2, 0], [1, 1, 1], [1, 1, 1]),
        Err(Error::SectionOutOfRange {
            axis: 1,
            start: 2,
            end: 1,
            extent: 3
        })
    );

    assert_eq!(
        wraparound(StridedView::<u32, [isize; 3]>::null(), [0, 0, 0], [1, 1, 1], [1, 1, 1]),
        Err(Error::NullView)
    );

    let empty = vw.axis_section(1, 0, 0, 1).unwrap();
    assert!(matches!(
        wraparound(empty, [0, 0, 0], [1, 1, 1], [1, 1, 1]),
        Err(Error::SectionOutOfRange { axis: 1, .. })
    ));

    let view = WrapView::identity(vw).unwrap();
    assert_eq!(view.axis_section(2, 0, 2, 0), Err(Error::ZeroStep { axis: 2 }));
}

/// Logical indices visited when traversing `start..end` with `step`.
fn visited(start: isize, end: isize, step: isize) -> Vec<isize> {
    let n = step.unsigned_abs();

    if step < 0 {
        (start..end).rev().step_by(n).collect()
    } else {
        (start..end).step_by(n).collect()
    }
}

/// Compose the affine map `(origin, step)` of an axis with a section of
/// `start..end` stepped by `step`, returning the new logical extent.
fn compose(map: &mut (isize, isize), start: isize, end: isize, step: isize) -> isize {
    let visited = visited(start, end, step);
    let first = visited.first().copied().unwrap_or(start);
    *map = (map.0 + first * map.1, map.1 * step);
    visited.len() as isize
}

fn random_step(rng: &mut StdRng) -> isize {
    let step = rng.gen_range(1..=3);

    if rng.gen() {
        -step
    } else {
        step
    }
}

#[test]
fn test_random_sections() {
    let mut rng = StdRng::seed_from_u64(0x77a9);

    let data = ring();
    let vw = StridedView::from_slice(&data, [10, 3, 4]).unwrap();
    let raw = vw.shape();

    for _ in 0..64 {
        // Unreduced raw index of logical index zero and the logical step, per
        // axis.
        let mut maps = [(0, 1); 3];
        let mut shape = [0; 3];
        let mut start = [0; 3];
        let mut end = [0; 3];
        let mut steps = [0; 3];

        for axis in 0..3 {
            start[axis] = rng.gen_range(-2 * raw[axis]..=2 * raw[axis]);
            end[axis] = rng.gen_range(start[axis]..=start[axis] + 2 * raw[axis]);
            steps[axis] = random_step(&mut rng);
            shape[axis] = compose(&mut maps[axis], start[axis], end[axis], steps[axis]);
        }

        let mut view = wraparound(vw, start, end, steps).unwrap();
        assert_eq!(view.shape(), shape);

        for _ in 0..3 {
            let axis = rng.gen_range(0..3);
            let len = shape[axis];
            let start = rng.gen_range(-len - 4..=len + 4);
            let end = rng.gen_range(start..=start + len + 4);
            let step = random_step(&mut rng);

            let section = view.axis_section(axis, start, end, step).unwrap();
            let composed = visited(start, end, step);

            // Sections may reach outside of the logical extent, where the view
            // they were cut from keeps wrapping.
            for coord in Indices::new(section.shape()) {
                let mut outer = coord;
                outer[axis] = composed[coord[axis] as usize];
                assert_eq!(section.get(coord).unwrap(), view.get(outer).unwrap());
            }

            shape[axis] = compose(&mut maps[axis], start, end, step);
            view = section;
        }

        assert_eq!(view.shape(), shape);

        for coord in Indices::new(shape) {
            let expected = [0, 1, 2].map(|axis| {
                let (origin, step) = maps[axis];
                (origin + coord[axis] * step).rem_euclid(raw[axis])
            });

            assert_eq!(view.physical(coord).unwrap(), expected);
            assert_eq!(view.get(coord).unwrap(), vw.get(expected).unwrap());
        }

        for k in -15..15 {
            let physical = view.physical([k, k, k]).unwrap();

            for axis in 0..3 {
                let (origin, step) = maps[axis];
                assert!((0..raw[axis]).contains(&physical[axis]));
                assert_eq!(physical[axis], (origin + k * step).rem_euclid(raw[axis]));
            }
        }
    }
}
