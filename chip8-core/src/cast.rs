/*
Copyright 2020 Anish Jewalikar

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

//! Common integer-range cast used wherever a wider host integer is
//! narrowed into the VM's fixed-width fields.

use std::convert::TryFrom;
use std::fmt::Display;

use crate::error::CastError;

/// Narrow `value` into `To`, raising [`CastError`] instead of truncating.
pub fn checked_cast<To, From>(value: From) -> Result<To, CastError>
where
    To: TryFrom<From>,
    From: Display + Copy,
{
    To::try_from(value).map_err(|_| CastError::new(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_range_values_pass_through() {
        let v: u8 = checked_cast(127i64).unwrap();
        assert_eq!(v, 127);

        let v: u16 = checked_cast(0xFFFi64).unwrap();
        assert_eq!(v, 0xFFF);
    }

    #[test]
    fn out_of_range_values_error() {
        assert!(checked_cast::<u8, i64>(256).is_err());
        assert!(checked_cast::<u8, i64>(-1).is_err());
        assert!(checked_cast::<u16, i64>(0x1_0000).is_err());
    }

    #[test]
    fn widening_always_succeeds() {
        let v: i64 = checked_cast(200u8).unwrap();
        assert_eq!(v, 200);
    }
}
