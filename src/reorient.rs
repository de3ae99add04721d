//! In-plane pixel reorientation conventions.
//!
//! All functions return views into the input, so composing them costs no
//! copies. Arrays are indexed `[row, column]`.

use ndarray::{ArrayView2, s};

/// Rotate 90° counterclockwise: `out[i, j] = input[j, columns - 1 - i]`
pub fn rotate_ccw<T>(view: ArrayView2<'_, T>) -> ArrayView2<'_, T> {
    view.reversed_axes().slice_move(s![..;-1, ..])
}

/// Mirror left to right: `out[i, j] = input[i, columns - 1 - j]`
pub fn mirror_horizontal<T>(view: ArrayView2<'_, T>) -> ArrayView2<'_, T> {
    view.slice_move(s![.., ..;-1])
}

/// Flip both axes at once
pub fn flip_both<T>(view: ArrayView2<'_, T>) -> ArrayView2<'_, T> {
    view.slice_move(s![..;-1, ..;-1])
}

/// Orientation applied to each DICOM slice when it is stacked into a volume
pub fn volume_convention<T>(slice: ArrayView2<'_, T>) -> ArrayView2<'_, T> {
    mirror_horizontal(rotate_ccw(slice))
}

/// Orientation applied to each plane of an existing segmentation volume
pub fn segmentation_convention<T>(plane: ArrayView2<'_, T>) -> ArrayView2<'_, T> {
    flip_both(rotate_ccw(plane))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_rotate_ccw() {
        let a = array![[1, 2, 3], [4, 5, 6]];
        assert_eq!(rotate_ccw(a.view()), array![[3, 6], [2, 5], [1, 4]]);
    }

    #[test]
    fn test_mirror_horizontal() {
        let a = array![[1, 2, 3], [4, 5, 6]];
        assert_eq!(mirror_horizontal(a.view()), array![[3, 2, 1], [6, 5, 4]]);
    }

    #[test]
    fn test_flip_both() {
        let a = array![[1, 2, 3], [4, 5, 6]];
        assert_eq!(flip_both(a.view()), array![[6, 5, 4], [3, 2, 1]]);
    }

    #[test]
    fn test_volume_convention() {
        let a = array![[1, 2, 3], [4, 5, 6]];
        // rotate then mirror is the transpose with both axes reversed
        assert_eq!(volume_convention(a.view()), array![[6, 3], [5, 2], [4, 1]]);
    }

    #[test]
    fn test_segmentation_convention() {
        let a = array![[1, 2, 3], [4, 5, 6]];
        // rotate then flip both is a clockwise rotation
        assert_eq!(segmentation_convention(a.view()), array![[4, 1], [5, 2], [6, 3]]);
    }

    #[test]
    fn test_conventions_differ() {
        let a = array![[1, 2], [3, 4]];
        assert_ne!(volume_convention(a.view()), segmentation_convention(a.view()));
    }
}
