//! Big numbers serialize as decimal strings so JSON consumers never lose
//! digits to a 64-bit float.

use num_bigint::BigInt;
use num_rational::BigRational;
use serde::Serializer;

pub(crate) fn big_int<S: Serializer>(value: &BigInt, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

#[allow(clippy::ptr_arg)]
pub(crate) fn big_ints<S: Serializer>(
    values: &Vec<BigInt>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(values.iter().map(ToString::to_string))
}

pub(crate) fn rational<S: Serializer>(
    value: &BigRational,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}
