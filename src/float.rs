use ndarray::ScalarOperand;
use num_traits::{FromPrimitive, NumAssignOps, NumCast};
use std::fmt;
use std::iter::Sum;

/// Floating point numbers
///
/// This trait bound multiplexes to the most common assumption of floating point number and
/// implement them for 32bit and 64bit floating points. Feature matrices and centroids are
/// generic over it.
pub trait Float:
    num_traits::Float
    + FromPrimitive
    + NumAssignOps
    + ScalarOperand
    + Sum
    + Default
    + fmt::Debug
    + fmt::Display
    + Send
    + Sync
    + 'static
{
    /// Lossy conversion from any primitive number, `NaN` if it cannot be represented.
    fn cast<T: NumCast>(x: T) -> Self {
        NumCast::from(x).unwrap_or_else(Self::nan)
    }
}

impl Float for f32 {}

impl Float for f64 {}
