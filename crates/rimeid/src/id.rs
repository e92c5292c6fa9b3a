use core::fmt;

/// A 64-bit, time-ordered identifier.
///
/// The raw value is always non-negative for IDs produced through a valid
/// [`Layout`]: the top bit is reserved and never set, so the same value is
/// safe to hand to systems that insist on signed or unsigned 64-bit
/// integers.
///
/// `SnowflakeId` says nothing about which bits mean what; splitting one
/// back into timestamp, datacenter, worker, and sequence requires the
/// [`Layout`] that packed it (see [`Layout::decompose`]).
///
/// IDs from a single generator compare in issue order, so the derived
/// `Ord` matches creation time.
///
/// [`Layout`]: crate::Layout
/// [`Layout::decompose`]: crate::Layout::decompose
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SnowflakeId {
    id: i64,
}

impl SnowflakeId {
    /// Wraps a raw value previously obtained from [`Self::to_raw`].
    pub const fn from_raw(id: i64) -> Self {
        Self { id }
    }

    /// The raw 64-bit value.
    pub const fn to_raw(self) -> i64 {
        self.id
    }

    /// Decimal rendering padded to 20 digits.
    ///
    /// Padded strings of IDs sort lexicographically in the same order as
    /// the IDs themselves, which is what you want for keys in systems that
    /// only compare strings.
    pub fn to_padded_string(self) -> String {
        format!("{:020}", self.id)
    }
}

impl From<i64> for SnowflakeId {
    fn from(id: i64) -> Self {
        Self::from_raw(id)
    }
}

impl From<SnowflakeId> for i64 {
    fn from(id: SnowflakeId) -> Self {
        id.to_raw()
    }
}

impl fmt::Display for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_round_trip() {
        let id = SnowflakeId::from_raw(8_675_309);
        assert_eq!(id.to_raw(), 8_675_309);
        assert_eq!(i64::from(id), 8_675_309);
        assert_eq!(SnowflakeId::from(8_675_309_i64), id);
    }

    #[test]
    fn ordering_follows_raw_value() {
        let a = SnowflakeId::from_raw(1);
        let b = SnowflakeId::from_raw(2);
        assert!(a < b);
        assert_eq!(a.max(b), b);
    }

    #[test]
    fn padded_strings_sort_like_ids() {
        let small = SnowflakeId::from_raw(99);
        let large = SnowflakeId::from_raw(1_000_000_000_000);
        assert_eq!(small.to_padded_string().len(), 20);
        assert_eq!(large.to_padded_string().len(), 20);
        assert!(small.to_padded_string() < large.to_padded_string());
    }

    #[test]
    fn display_is_plain_decimal() {
        assert_eq!(SnowflakeId::from_raw(42).to_string(), "42");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_round_trip() {
        let id = SnowflakeId::from_raw(123_456_789);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#"{"id":123456789}"#);
        let back: SnowflakeId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
