use fixed::types::extra::U16;

/// 16.16-bit signed fixed-point number
pub type Fixed = fixed::FixedI32<U16>;

/// 16-bit signed integer that describes a quantity in FUnits, the smallest
/// measurable distance in em space
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct FWord(pub i16);

/// The long internal format of a date in seconds since 12:00 midnight, January
/// 1, 1904. It is represented as a signed 64-bit integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct LongDateTime(pub i64);
