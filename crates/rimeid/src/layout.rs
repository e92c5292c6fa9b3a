use crate::{Error, Result, SnowflakeId};
use core::fmt;

/// Bit allocation for the fields packed into a [`SnowflakeId`].
///
/// An ID reads, most significant to least significant:
///
/// ```text
/// | 1 reserved bit | timestamp | datacenter id | worker id | sequence |
/// ```
///
/// The top bit is never set, keeping the value non-negative as a signed
/// 64-bit integer. The three low fields are configured directly; the
/// timestamp width is whatever remains of the 63 usable bits, so widening
/// one field narrows the ID's time horizon rather than silently colliding
/// with a neighbour.
///
/// The default split is `5 / 5 / 12`: 32 datacenters, 32 workers per
/// datacenter, 4096 IDs per worker per millisecond, and 41 bits of
/// milliseconds (roughly 69 years past the generator's epoch).
///
/// # Example
///
/// ```
/// use rimeid::Layout;
///
/// let layout = Layout::default();
/// assert_eq!(layout.timestamp_bits(), 41);
/// assert_eq!(layout.max_datacenter_id(), 31);
/// assert_eq!(layout.max_sequence(), 4095);
///
/// let id = layout.compose(1_000, 3, 7, 42);
/// let parts = layout.decompose(id);
/// assert_eq!(parts.timestamp, 1_000);
/// assert_eq!(parts.datacenter_id, 3);
/// assert_eq!(parts.worker_id, 7);
/// assert_eq!(parts.sequence, 42);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Layout {
    datacenter_id_bits: u32,
    worker_id_bits: u32,
    sequence_bits: u32,
}

impl Default for Layout {
    fn default() -> Self {
        // 5/5/12 is the classic allocation; always within the bit budget.
        Self {
            datacenter_id_bits: 5,
            worker_id_bits: 5,
            sequence_bits: 12,
        }
    }
}

impl Layout {
    /// Usable bits below the reserved sign bit.
    pub const TOTAL_BITS: u32 = 63;

    /// Builds a layout from the three configurable widths.
    ///
    /// Fails with [`Error::InvalidLayout`] when the widths sum past
    /// [`Self::TOTAL_BITS`] and would leave the timestamp no room. A width
    /// of zero is allowed and pins the corresponding field to `0`.
    pub const fn new(
        datacenter_id_bits: u32,
        worker_id_bits: u32,
        sequence_bits: u32,
    ) -> Result<Self> {
        let total_bits = datacenter_id_bits
            .saturating_add(worker_id_bits)
            .saturating_add(sequence_bits);
        if total_bits > Self::TOTAL_BITS {
            return Err(Error::InvalidLayout { total_bits });
        }
        Ok(Self {
            datacenter_id_bits,
            worker_id_bits,
            sequence_bits,
        })
    }

    /// Configured width of the datacenter id field.
    pub const fn datacenter_id_bits(&self) -> u32 {
        self.datacenter_id_bits
    }

    /// Configured width of the worker id field.
    pub const fn worker_id_bits(&self) -> u32 {
        self.worker_id_bits
    }

    /// Configured width of the sequence field.
    pub const fn sequence_bits(&self) -> u32 {
        self.sequence_bits
    }

    /// Width left over for the timestamp field.
    pub const fn timestamp_bits(&self) -> u32 {
        Self::TOTAL_BITS - self.datacenter_id_bits - self.worker_id_bits - self.sequence_bits
    }

    /// Bits the worker id is shifted left by: the sequence width.
    pub const fn worker_id_shift(&self) -> u32 {
        self.sequence_bits
    }

    /// Bits the datacenter id is shifted left by.
    pub const fn datacenter_id_shift(&self) -> u32 {
        self.sequence_bits + self.worker_id_bits
    }

    /// Bits the timestamp is shifted left by.
    pub const fn timestamp_shift(&self) -> u32 {
        self.sequence_bits + self.worker_id_bits + self.datacenter_id_bits
    }

    /// Largest datacenter id this layout can carry: `2^bits - 1`.
    pub const fn max_datacenter_id(&self) -> i64 {
        Self::mask(self.datacenter_id_bits)
    }

    /// Largest worker id this layout can carry: `2^bits - 1`.
    pub const fn max_worker_id(&self) -> i64 {
        Self::mask(self.worker_id_bits)
    }

    /// Largest sequence value (and the sequence mask): `2^bits - 1`.
    pub const fn max_sequence(&self) -> i64 {
        Self::mask(self.sequence_bits)
    }

    /// Largest epoch-relative millisecond value the timestamp field holds.
    pub const fn max_timestamp(&self) -> i64 {
        Self::mask(self.timestamp_bits())
    }

    const fn mask(bits: u32) -> i64 {
        // bits <= 63 by construction, so this cannot overflow into the
        // sign bit.
        ((1u64 << bits) - 1) as i64
    }

    /// Packs the four fields into an ID.
    ///
    /// `timestamp` is epoch-relative milliseconds. Every field is masked to
    /// its configured width; in debug builds an out-of-range field panics
    /// instead of wrapping.
    pub fn compose(
        &self,
        timestamp: i64,
        datacenter_id: i64,
        worker_id: i64,
        sequence: i64,
    ) -> SnowflakeId {
        debug_assert!(
            timestamp >= 0 && timestamp <= self.max_timestamp(),
            "timestamp field overflow"
        );
        debug_assert!(
            datacenter_id >= 0 && datacenter_id <= self.max_datacenter_id(),
            "datacenter id field overflow"
        );
        debug_assert!(
            worker_id >= 0 && worker_id <= self.max_worker_id(),
            "worker id field overflow"
        );
        debug_assert!(
            sequence >= 0 && sequence <= self.max_sequence(),
            "sequence field overflow"
        );
        let raw = ((timestamp & self.max_timestamp()) << self.timestamp_shift())
            | ((datacenter_id & self.max_datacenter_id()) << self.datacenter_id_shift())
            | ((worker_id & self.max_worker_id()) << self.worker_id_shift())
            | (sequence & self.max_sequence());
        SnowflakeId::from_raw(raw)
    }

    /// Epoch-relative milliseconds carried by `id`.
    pub const fn timestamp(&self, id: SnowflakeId) -> i64 {
        (id.to_raw() >> self.timestamp_shift()) & self.max_timestamp()
    }

    /// Datacenter id carried by `id`.
    pub const fn datacenter_id(&self, id: SnowflakeId) -> i64 {
        (id.to_raw() >> self.datacenter_id_shift()) & self.max_datacenter_id()
    }

    /// Worker id carried by `id`.
    pub const fn worker_id(&self, id: SnowflakeId) -> i64 {
        (id.to_raw() >> self.worker_id_shift()) & self.max_worker_id()
    }

    /// Sequence number carried by `id`.
    pub const fn sequence(&self, id: SnowflakeId) -> i64 {
        id.to_raw() & self.max_sequence()
    }

    /// Splits `id` back into the fields it was packed from.
    pub const fn decompose(&self, id: SnowflakeId) -> IdParts {
        IdParts {
            timestamp: self.timestamp(id),
            datacenter_id: self.datacenter_id(id),
            worker_id: self.worker_id(id),
            sequence: self.sequence(id),
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "timestamp:{} | datacenter:{} | worker:{} | sequence:{}",
            self.timestamp_bits(),
            self.datacenter_id_bits,
            self.worker_id_bits,
            self.sequence_bits
        )
    }
}

/// The unpacked fields of a [`SnowflakeId`], as produced by
/// [`Layout::decompose`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IdParts {
    /// Milliseconds since the generator's epoch.
    pub timestamp: i64,
    /// Datacenter identifier.
    pub datacenter_id: i64,
    /// Worker identifier.
    pub worker_id: i64,
    /// Per-millisecond sequence number.
    pub sequence: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_matches_the_classic_split() {
        let layout = Layout::default();
        assert_eq!(layout.datacenter_id_bits(), 5);
        assert_eq!(layout.worker_id_bits(), 5);
        assert_eq!(layout.sequence_bits(), 12);
        assert_eq!(layout.timestamp_bits(), 41);
        assert_eq!(layout.max_datacenter_id(), 31);
        assert_eq!(layout.max_worker_id(), 31);
        assert_eq!(layout.max_sequence(), 4095);
        assert_eq!(layout.max_timestamp(), (1 << 41) - 1);
    }

    #[test]
    fn shifts_stack_from_the_sequence_upward() {
        let layout = Layout::new(5, 5, 12).unwrap();
        assert_eq!(layout.worker_id_shift(), 12);
        assert_eq!(layout.datacenter_id_shift(), 17);
        assert_eq!(layout.timestamp_shift(), 22);
    }

    #[test]
    fn rejects_widths_past_the_bit_budget() {
        let err = Layout::new(20, 20, 24).unwrap_err();
        assert_eq!(err, Error::InvalidLayout { total_bits: 64 });
        // Exactly 63 is fine; the timestamp just ends up with zero bits.
        let degenerate = Layout::new(20, 20, 23).unwrap();
        assert_eq!(degenerate.timestamp_bits(), 0);
        assert_eq!(degenerate.max_timestamp(), 0);
    }

    #[test]
    fn width_sums_that_overflow_u32_still_fail() {
        assert!(Layout::new(u32::MAX, u32::MAX, u32::MAX).is_err());
    }

    #[test]
    fn compose_and_decompose_are_inverse() {
        let layout = Layout::default();
        let id = layout.compose(123_456, 31, 0, 4095);
        assert_eq!(layout.timestamp(id), 123_456);
        assert_eq!(layout.datacenter_id(id), 31);
        assert_eq!(layout.worker_id(id), 0);
        assert_eq!(layout.sequence(id), 4095);
        assert_eq!(
            layout.decompose(id),
            IdParts {
                timestamp: 123_456,
                datacenter_id: 31,
                worker_id: 0,
                sequence: 4095,
            }
        );
    }

    #[test]
    fn maxed_out_fields_never_touch_the_sign_bit() {
        let layout = Layout::default();
        let id = layout.compose(
            layout.max_timestamp(),
            layout.max_datacenter_id(),
            layout.max_worker_id(),
            layout.max_sequence(),
        );
        assert_eq!(id.to_raw(), i64::MAX);
        assert!(id.to_raw() >= 0);
    }

    #[test]
    fn zero_width_fields_extract_as_zero() {
        let layout = Layout::new(0, 10, 10).unwrap();
        assert_eq!(layout.max_datacenter_id(), 0);
        let id = layout.compose(77, 0, 1023, 5);
        assert_eq!(layout.datacenter_id(id), 0);
        assert_eq!(layout.worker_id(id), 1023);
        assert_eq!(layout.timestamp(id), 77);
    }

    #[test]
    fn display_shows_the_field_widths() {
        let rendered = Layout::default().to_string();
        assert_eq!(rendered, "timestamp:41 | datacenter:5 | worker:5 | sequence:12");
    }
}
