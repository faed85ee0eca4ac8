//! Object identifier type.
//!
//! [`Oid`] orders lexicographically arc by arc, with a prefix sorting before
//! every OID it prefixes (`1.3.6.1.2` < `1.3.6.1.2.1` < `1.3.6.1.3`). The
//! managed-object registry relies on exactly this ordering for GETNEXT.

use smallvec::SmallVec;

use crate::error::{DecodeErrorKind, Error, OidErrorKind, Result};

/// Maximum number of arcs accepted in an OID (RFC 2578 limit).
pub const MAX_OID_LEN: usize = 128;

/// Inline capacity covers typical MIB-2 instance OIDs without allocating.
type Arcs = SmallVec<[u32; 16]>;

/// Object identifier.
///
/// The derived `Ord` compares the arc sequences lexicographically, which is
/// the SNMP ordering.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Oid {
    arcs: Arcs,
}

impl Oid {
    /// Create an OID from a vector of arcs.
    pub fn new(arcs: impl IntoIterator<Item = u32>) -> Self {
        Self {
            arcs: arcs.into_iter().collect(),
        }
    }

    /// Create an OID from a slice of arcs.
    pub fn from_slice(arcs: &[u32]) -> Self {
        Self {
            arcs: SmallVec::from_slice(arcs),
        }
    }

    /// Parse an OID from dotted notation (e.g. `"1.3.6.1.2.1.1.3.0"`).
    ///
    /// A single leading dot is accepted (`".1.3.6.1"`), as printed by net-snmp.
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.strip_prefix('.').unwrap_or(s);
        if trimmed.is_empty() {
            return Err(Error::invalid_oid_with_input(OidErrorKind::Empty, s));
        }

        let mut arcs = Arcs::new();
        for part in trimmed.split('.') {
            let arc = part
                .parse::<u32>()
                .map_err(|_| Error::invalid_oid_with_input(OidErrorKind::InvalidArc, s))?;
            arcs.push(arc);
        }

        if arcs.len() > MAX_OID_LEN {
            return Err(Error::invalid_oid_with_input(
                OidErrorKind::TooManyArcs {
                    count: arcs.len(),
                    max: MAX_OID_LEN,
                },
                s,
            ));
        }

        Ok(Self { arcs })
    }

    /// Check the X.660 constraints on the first two arcs.
    ///
    /// BER encoding packs the first two arcs into one subidentifier, so an OID
    /// that fails this check does not survive an encode/decode round-trip.
    pub fn validate(&self) -> Result<()> {
        if self.arcs.len() < 2 {
            return Err(Error::invalid_oid(OidErrorKind::TooShort));
        }
        let (first, second) = (self.arcs[0], self.arcs[1]);
        if first > 2 {
            return Err(Error::invalid_oid(OidErrorKind::InvalidFirstArc(first)));
        }
        if first < 2 && second >= 40 {
            return Err(Error::invalid_oid(OidErrorKind::InvalidSecondArc {
                first,
                second,
            }));
        }
        if self.arcs.len() > MAX_OID_LEN {
            return Err(Error::invalid_oid(OidErrorKind::TooManyArcs {
                count: self.arcs.len(),
                max: MAX_OID_LEN,
            }));
        }
        Ok(())
    }

    /// The arcs as a slice.
    pub fn arcs(&self) -> &[u32] {
        &self.arcs
    }

    /// Number of arcs.
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    /// Whether the OID has no arcs.
    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    /// Whether `prefix` is a (non-strict) prefix of this OID.
    pub fn starts_with(&self, prefix: &Oid) -> bool {
        self.arcs.starts_with(&prefix.arcs)
    }

    /// Create a child OID by appending an arc.
    pub fn child(&self, arc: u32) -> Self {
        let mut arcs = self.arcs.clone();
        arcs.push(arc);
        Self { arcs }
    }

    /// Decode the content octets of a BER OBJECT IDENTIFIER.
    pub fn from_ber(data: &[u8]) -> Result<Self> {
        let mut arcs = Arcs::new();
        if data.is_empty() {
            return Ok(Self { arcs });
        }

        let mut subids = Vec::with_capacity(data.len());
        let mut current: u64 = 0;
        let mut in_progress = false;
        for (i, &byte) in data.iter().enumerate() {
            // A leading 0x80 is a non-minimal (padded) subidentifier.
            if !in_progress && byte == 0x80 {
                return Err(Error::decode(i, DecodeErrorKind::InvalidOidEncoding));
            }
            current = (current << 7) | u64::from(byte & 0x7F);
            if current > u64::from(u32::MAX) + 80 {
                return Err(Error::decode(i, DecodeErrorKind::InvalidOidEncoding));
            }
            if byte & 0x80 == 0 {
                subids.push(current);
                current = 0;
                in_progress = false;
            } else {
                in_progress = true;
            }
        }
        if in_progress {
            return Err(Error::decode(
                data.len(),
                DecodeErrorKind::InvalidOidEncoding,
            ));
        }

        let first = subids[0];
        let (a, b) = match first {
            0..=39 => (0, first),
            40..=79 => (1, first - 40),
            _ => (2, first - 80),
        };
        let second =
            u32::try_from(b).map_err(|_| Error::decode(0, DecodeErrorKind::InvalidOidEncoding))?;
        arcs.push(a as u32);
        arcs.push(second);

        for &subid in &subids[1..] {
            let arc = u32::try_from(subid)
                .map_err(|_| Error::decode(0, DecodeErrorKind::InvalidOidEncoding))?;
            arcs.push(arc);
        }

        if arcs.len() > MAX_OID_LEN {
            return Err(Error::decode(
                0,
                DecodeErrorKind::OidTooLong {
                    count: arcs.len(),
                    max: MAX_OID_LEN,
                },
            ));
        }

        Ok(Self { arcs })
    }

    /// Encode the content octets of a BER OBJECT IDENTIFIER.
    ///
    /// OIDs shorter than two arcs are padded with zero arcs, matching the
    /// behaviour of common agents.
    pub fn to_ber_smallvec(&self) -> SmallVec<[u8; 64]> {
        let mut out = SmallVec::new();
        if self.arcs.is_empty() {
            return out;
        }

        let second = self.arcs.get(1).copied().unwrap_or(0);
        let first = u64::from(self.arcs[0]) * 40 + u64::from(second);
        push_subid(&mut out, first);
        for &arc in self.arcs.iter().skip(2) {
            push_subid(&mut out, u64::from(arc));
        }
        out
    }
}

/// Append one base-128 subidentifier.
fn push_subid(out: &mut SmallVec<[u8; 64]>, value: u64) {
    let mut tmp = [0u8; 10];
    let mut n = 0;
    let mut v = value;
    loop {
        tmp[n] = (v & 0x7F) as u8;
        n += 1;
        v >>= 7;
        if v == 0 {
            break;
        }
    }
    for i in (0..n).rev() {
        let continuation = if i > 0 { 0x80 } else { 0 };
        out.push(tmp[i] | continuation);
    }
}

impl std::fmt::Display for Oid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut iter = self.arcs.iter();
        if let Some(first) = iter.next() {
            write!(f, "{}", first)?;
            for arc in iter {
                write!(f, ".{}", arc)?;
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for Oid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Oid({})", self)
    }
}

impl std::str::FromStr for Oid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<&[u32]> for Oid {
    fn from(arcs: &[u32]) -> Self {
        Self::from_slice(arcs)
    }
}

impl<const N: usize> From<[u32; N]> for Oid {
    fn from(arcs: [u32; N]) -> Self {
        Self::from_slice(&arcs)
    }
}

/// Construct an [`Oid`] from arc literals.
///
/// ```rust
/// use snmp_agent::oid;
///
/// let sys_uptime = oid!(1, 3, 6, 1, 2, 1, 1, 3, 0);
/// assert_eq!(sys_uptime.to_string(), "1.3.6.1.2.1.1.3.0");
/// ```
#[macro_export]
macro_rules! oid {
    ($($arc:expr),* $(,)?) => {
        $crate::oid::Oid::from_slice(&[$($arc),*])
    };
}
