use crate::{
    wraparound, Error, FrameFormat, NdFormat, OpaqueView, RawFormat, StridedView, View,
};

fn bytes(n: u8) -> Vec<u8> {
    (0..n).collect()
}

#[test]
fn test_frames() {
    let data = bytes(24);
    let view = OpaqueView::from_bytes(&data, [2, 3], RawFormat::new(4)).unwrap();

    assert_eq!(view.shape(), [2, 3]);
    assert_eq!(view.strides(), [12, 4]);
    assert_eq!(view.size(), 6);
    assert_eq!(view.base_view().shape(), [2, 3, 4]);
    assert!(view.has_default_strides_without_padding(0));

    let mut frame = [0u8; 4];
    view.frame_at([1, 2]).unwrap().read_into(&mut frame).unwrap();
    assert_eq!(frame, [20, 21, 22, 23]);

    let starts = view.frames().map(|f| f.as_ptr()).collect::<Vec<_>>();
    assert_eq!(starts.len(), 6);

    for (n, start) in starts.into_iter().enumerate() {
        assert_eq!(start, data[n * 4..].as_ptr());
    }
}

#[test]
fn test_sections_keep_frames_whole() {
    let data = bytes(24);
    let view = OpaqueView::from_bytes(&data, [2, 3], RawFormat::new(4)).unwrap();

    let reversed = view.section([0, 0], [2, 3], [1, -1]).unwrap();
    assert_eq!(reversed.shape(), [2, 3]);
    assert_eq!(reversed.base_view().shape(), [2, 3, 4]);
    assert_eq!(
        reversed.frame_at([0, 0]).unwrap().as_ptr(),
        view.frame_at([0, 2]).unwrap().as_ptr()
    );

    let column = view.slice(1, 1).unwrap();
    assert_eq!(column.shape(), [2]);
    assert_eq!(
        column.frame_at([1]).unwrap().as_ptr(),
        view.frame_at([1, 1]).unwrap().as_ptr()
    );

    assert_eq!(
        view.axis_section(2, 0, 2, 1),
        Err(Error::AxisOutOfRange { axis: 2, ndim: 2 })
    );

    let section = view.fcall().all().step_range(0, 3, 2).unwrap().into_view();
    assert_eq!(section.shape(), [2, 2]);
    assert_eq!(section.strides(), [12, 8]);
}

#[test]
fn test_assign_and_compare() {
    let data = bytes(24);
    let mut out = vec![0u8; 24];

    {
        let source = OpaqueView::from_bytes(&data, [2, 3], RawFormat::new(4)).unwrap();
        let reversed = source.section([0, 0], [2, 3], [-1, 1]).unwrap();

        let target = OpaqueView::from_mut_bytes(&mut out, [2, 3], RawFormat::new(4)).unwrap();
        target.assign(&reversed).unwrap();
        assert!(target.compare(&reversed).unwrap());
        assert_eq!(target, reversed);
        assert_ne!(target, source);
    }

    assert_eq!(&out[..12], &data[12..]);
    assert_eq!(&out[12..], &data[..12]);
}

#[test]
fn test_format_mismatch() {
    let data = bytes(24);

    let a = OpaqueView::from_bytes(&data, [2, 3], RawFormat::new(4)).unwrap();
    let b = OpaqueView::from_bytes(&data, [2, 3], RawFormat::new(2)).unwrap();
    assert_eq!(a.compare(&b), Err(Error::FormatMismatch { left: 4, right: 2 }));

    let c = OpaqueView::from_bytes(&data, [3, 2], RawFormat::new(4)).unwrap();
    assert_eq!(
        a.compare(&c),
        Err(Error::ShapeMismatch {
            left: vec![2, 3],
            right: vec![3, 2],
        })
    );
}

#[test]
fn test_padded_frames_ignore_padding() {
    // Two u16 elements per frame, four bytes apart.
    let format = NdFormat::new(2, 2, &[2], &[4]).unwrap();
    assert_eq!(format.frame_size(), 6);
    assert!(!format.is_contiguous());

    let a = [1, 1, 0xaa, 0xaa, 2, 2, 3, 3, 0xaa, 0xaa, 4, 4];
    let b = [1, 1, 0xbb, 0xbb, 2, 2, 3, 3, 0xbb, 0xbb, 4, 4];
    let mut c = [0u8; 12];

    {
        let a = OpaqueView::from_bytes(&a[..], [2], format).unwrap();
        let b = OpaqueView::from_bytes(&b[..], [2], format).unwrap();
        assert_eq!(a, b);

        let c = OpaqueView::from_mut_bytes(&mut c[..], [2], format).unwrap();
        c.assign(&a).unwrap();
    }

    assert_eq!(c, [1, 1, 0, 0, 2, 2, 3, 3, 0, 0, 4, 4]);
}

#[test]
fn test_transposed_frames() {
    // The same 2x2 frame of u16 stored row by row and column by column.
    let rows = NdFormat::new(2, 2, &[2, 2], &[4, 2]).unwrap();
    let columns = NdFormat::new(2, 2, &[2, 2], &[2, 4]).unwrap();
    assert!(rows.is_compatible(&columns));

    let a = [1, 1, 2, 2, 3, 3, 4, 4];
    let b = [1, 1, 3, 3, 2, 2, 4, 4];
    let mut c = [0u8; 8];
    let mut d = [0u8; 8];

    {
        let a = OpaqueView::from_bytes(&a[..], [1], rows).unwrap();
        let b = OpaqueView::from_bytes(&b[..], [1], columns).unwrap();
        assert!(a.compare(&b).unwrap());
        assert_eq!(a, b);

        let c = OpaqueView::from_mut_bytes(&mut c[..], [1], rows).unwrap();
        c.assign(&b).unwrap();

        let d = OpaqueView::from_mut_bytes(&mut d[..], [1], columns).unwrap();
        d.assign(&a).unwrap();
    }

    assert_eq!(c, a);
    assert_eq!(d, b);

    // Same frame size, different number of elements.
    let flat = NdFormat::new(2, 2, &[4], &[2]).unwrap();
    let a = OpaqueView::from_bytes(&a[..], [1], rows).unwrap();
    let e = OpaqueView::from_bytes(&b[..], [1], flat).unwrap();
    assert_eq!(a.compare(&e), Err(Error::FormatMismatch { left: 8, right: 8 }));
}

#[test]
fn test_frame_handle() {
    let mut data = vec![0u8; 24];

    {
        let view = OpaqueView::from_mut_bytes(&mut data, [2, 3], RawFormat::new(4)).unwrap();
        let frame = view.at([1, 0]).unwrap().frame_handle().unwrap();
        assert_eq!(frame.frame_size(), 4);
        assert_eq!(frame.format(), &RawFormat::new(4));
        frame.write_from(&[9, 8, 7, 6, 5]).unwrap();

        assert_eq!(
            frame.write_from(&[1, 2]),
            Err(Error::BufferTooSmall {
                required: 4,
                len: 2
            })
        );

        assert_eq!(
            frame.read_into(&mut [0u8; 3]),
            Err(Error::BufferTooSmall {
                required: 4,
                len: 3
            })
        );
    }

    assert_eq!(&data[12..16], &[9, 8, 7, 6]);
}

#[test]
fn test_padded_strides() {
    let data = bytes(18);

    // SAFETY: three frames of four bytes, six bytes apart, fit in 18 bytes.
    let view = unsafe {
        OpaqueView::<RawFormat, [isize; 1]>::with_default_strides(
            data.as_ptr() as *mut u8,
            [3],
            RawFormat::new(4),
            2,
        )
        .unwrap()
    };

    assert_eq!(view.strides(), [6]);
    assert_eq!(view.default_strides_padding(0), Some(2));
    assert!(view.has_default_strides(0));
    assert!(!view.has_default_strides_without_padding(0));

    let mut frame = [0u8; 4];
    view.frame_at([2]).unwrap().read_into(&mut frame).unwrap();
    assert_eq!(frame, [12, 13, 14, 15]);
}

#[test]
fn test_from_base() {
    let data = bytes(24);
    let base = StridedView::from_slice(&data, [2, 12]).unwrap();

    assert!(matches!(
        OpaqueView::<_, [isize; 1]>::from_base(base, RawFormat::new(4)),
        Err(Error::LayoutMismatch { .. })
    ));

    let view = OpaqueView::<_, [isize; 1]>::from_base(base, RawFormat::new(12)).unwrap();
    assert_eq!(view.shape(), [2]);
    assert_eq!(view.strides(), [12]);
}

#[test]
fn test_null() {
    let view = OpaqueView::<_, [isize; 2]>::null(RawFormat::new(4));
    assert!(view.is_null());
    assert_eq!(view.frames().count(), 0);
    assert_eq!(view.at([0, 0]).map(|_| ()), Err(Error::NullView));
    assert_eq!(view, OpaqueView::<_, [isize; 2]>::null(RawFormat::new(4)));
    assert_eq!(view.frame_at([0, 0]).map(|_| ()), Err(Error::NullView));

    let point = OpaqueView::<_, [isize; 0]>::null(RawFormat::new(4));
    assert_eq!(point.frame_handle().map(|_| ()), Err(Error::NullView));
}

#[test]
fn test_wrapped_frames() {
    let data = bytes(40);
    let view = OpaqueView::from_bytes(&data, [10], RawFormat::new(4)).unwrap();
    let ring = wraparound(view, [8], [12], [1]).unwrap();

    assert_eq!(ring.shape(), [4]);
    assert!(ring.axis_wraps(0).unwrap());

    let frame = ring.at([2]).unwrap().frame_handle().unwrap();
    assert_eq!(frame.as_ptr(), data.as_ptr());

    let frame = ring.slice(1, 0).unwrap().at([]).unwrap().frame_handle().unwrap();
    assert_eq!(frame.as_ptr(), data[36..].as_ptr());
}

#[test]
fn test_unaligned_frames() {
    let data = bytes(17);
    let format = NdFormat::contiguous::<i32>(&[2]).unwrap();

    // Frames start at an odd address.
    let view = OpaqueView::from_bytes(&data[1..], [2], format).unwrap();

    let mut frame = [0u8; 8];
    view.frame_at([1]).unwrap().read_into(&mut frame).unwrap();
    assert_eq!(frame, [9, 10, 11, 12, 13, 14, 15, 16]);

    let typed = StridedView::<i32, [isize; 2]>::from_opaque(&view).unwrap();
    assert_eq!(typed.get([1, 1]).unwrap(), i32::from_ne_bytes([13, 14, 15, 16]));
}
