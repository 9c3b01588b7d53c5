//! Canonical binary encoding of transactions.
//!
//! The byte layout is fixed and consensus-critical: the transaction ID is
//! the BLAKE3 hash of exactly these bytes.
//!
//! ```text
//! flags        u8       bit0: signature present, bit1: public key present
//! version      u8
//! lock_time    u32 LE
//! fee          varint   unsigned LEB128, shortest form
//! memo         varint length || UTF-8
//! payload_type u8
//! payload      per variant, see below
//! signature    [64]     if bit0
//! public_key   [32]     if bit1
//! ```
//!
//! Payload bodies (addresses are always 21 bytes):
//!
//! ```text
//! Transfer       from to amount:varint
//! Bond           from to pk_len:u8 (0|32) pk stake:varint
//! Sortition      validator proof[48]
//! Unbond         validator
//! Withdraw       from to amount:varint
//! BatchTransfer  from count:varint (to amount:varint)*
//! ```
//!
//! Every variable-length field is prefixed and varints must be minimal, so
//! each logical transaction has exactly one encoding and every accepted
//! byte string re-encodes to itself.

use bytes::{Buf, BufMut};
use thiserror::Error;

use super::builder::Transaction;
use super::payload::{
    BatchTransferPayload, BondPayload, Payload, Recipient, SortitionPayload, TransferPayload,
    UnbondPayload, WithdrawPayload,
};
use super::types::{Amount, PayloadType};
use crate::config::{ADDRESS_LENGTH, PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH, SORTITION_PROOF_LENGTH};
use crate::crypto::{Address, AddressError, KeyError, NovaPublicKey, NovaSignature};

const FLAG_SIGNATURE: u8 = 0x01;
const FLAG_PUBLIC_KEY: u8 = 0x02;
const KNOWN_FLAGS: u8 = FLAG_SIGNATURE | FLAG_PUBLIC_KEY;

/// LEB128 needs at most 10 bytes for a `u64`.
const MAX_VARINT_LENGTH: usize = 10;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Reasons a byte string is not a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Input ended before `field` was complete.
    #[error("unexpected end of input while reading {field}")]
    Truncated { field: &'static str },

    /// Bytes left over after a complete transaction.
    #[error("{0} trailing bytes after transaction")]
    TrailingBytes(usize),

    /// Flag bits this version does not define.
    #[error("unknown flags: {0:#04x}")]
    UnknownFlags(u8),

    /// A payload discriminant outside the closed set.
    #[error("unknown payload type: {0}")]
    UnknownPayloadType(u8),

    /// A malformed address field.
    #[error("invalid {field}: {source}")]
    InvalidAddress {
        field: &'static str,
        #[source]
        source: AddressError,
    },

    /// Public key bytes that are not a valid key.
    #[error("invalid public key: {0}")]
    InvalidPublicKey(#[from] KeyError),

    /// The bond public-key length byte is neither 0 nor 32.
    #[error("invalid public key length: {0}")]
    InvalidPublicKeyLength(u8),

    /// A varint that does not fit in 64 bits.
    #[error("varint overflow while reading {field}")]
    VarintOverflow { field: &'static str },

    /// A varint with redundant trailing zero groups.
    #[error("non-canonical varint while reading {field}")]
    NonCanonicalVarint { field: &'static str },

    /// The memo is not valid UTF-8.
    #[error("memo is not valid UTF-8")]
    InvalidMemo,
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

impl Transaction {
    /// The canonical encoding of the whole transaction.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(192);
        buf.put_u8(self.flags());
        self.put_sign_bytes(&mut buf);
        if let Some(sig) = &self.signature {
            buf.put_slice(sig.as_bytes());
        }
        if let Some(pk) = &self.public_key {
            buf.put_slice(pk.as_bytes());
        }
        buf
    }

    /// The bytes a signer signs: everything from `version` through the
    /// payload. Flags, signature and public key are excluded.
    pub fn sign_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(160);
        self.put_sign_bytes(&mut buf);
        buf
    }

    /// Lowercase hex of [`Transaction::to_bytes`]: the raw transaction text.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Decodes canonical bytes. Rejects truncated input, trailing bytes and
    /// any value outside the closed sets of the format.
    pub fn from_bytes(data: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader { buf: data };

        let flags = r.u8("flags")?;
        if flags & !KNOWN_FLAGS != 0 {
            return Err(DecodeError::UnknownFlags(flags));
        }

        let version = r.u8("version")?;
        let lock_time = r.u32_le("lock time")?;
        let fee = Amount::new(r.varint("fee")?);
        let memo = r.string("memo")?;
        let payload = r.payload()?;

        let signature = if flags & FLAG_SIGNATURE != 0 {
            Some(NovaSignature::from_bytes(
                r.array::<SIGNATURE_LENGTH>("signature")?,
            ))
        } else {
            None
        };

        let public_key = if flags & FLAG_PUBLIC_KEY != 0 {
            Some(NovaPublicKey::from_bytes(
                r.array::<PUBLIC_KEY_LENGTH>("public key")?,
            )?)
        } else {
            None
        };

        if r.buf.has_remaining() {
            return Err(DecodeError::TrailingBytes(r.buf.remaining()));
        }

        Ok(Self {
            version,
            lock_time,
            fee,
            memo,
            public_key,
            signature,
            payload,
        })
    }

    fn flags(&self) -> u8 {
        let mut flags = 0;
        if self.signature.is_some() {
            flags |= FLAG_SIGNATURE;
        }
        if self.public_key.is_some() {
            flags |= FLAG_PUBLIC_KEY;
        }
        flags
    }

    fn put_sign_bytes(&self, buf: &mut Vec<u8>) {
        buf.put_u8(self.version);
        buf.put_u32_le(self.lock_time);
        put_varint(buf, self.fee.value());
        put_varint(buf, self.memo.len() as u64);
        buf.put_slice(self.memo.as_bytes());
        buf.put_u8(self.payload.payload_type().as_byte());
        put_payload(buf, &self.payload);
    }
}

fn put_payload(buf: &mut Vec<u8>, payload: &Payload) {
    match payload {
        Payload::Transfer(p) => {
            buf.put_slice(p.from.as_bytes());
            buf.put_slice(p.to.as_bytes());
            put_varint(buf, p.amount.value());
        }
        Payload::Bond(p) => {
            buf.put_slice(p.from.as_bytes());
            buf.put_slice(p.to.as_bytes());
            match &p.public_key {
                Some(pk) => {
                    buf.put_u8(PUBLIC_KEY_LENGTH as u8);
                    buf.put_slice(pk.as_bytes());
                }
                None => buf.put_u8(0),
            }
            put_varint(buf, p.stake.value());
        }
        Payload::Sortition(p) => {
            buf.put_slice(p.validator.as_bytes());
            buf.put_slice(&p.proof);
        }
        Payload::Unbond(p) => {
            buf.put_slice(p.validator.as_bytes());
        }
        Payload::Withdraw(p) => {
            buf.put_slice(p.from.as_bytes());
            buf.put_slice(p.to.as_bytes());
            put_varint(buf, p.amount.value());
        }
        Payload::BatchTransfer(p) => {
            buf.put_slice(p.from.as_bytes());
            put_varint(buf, p.recipients.len() as u64);
            for r in &p.recipients {
                buf.put_slice(r.to.as_bytes());
                put_varint(buf, r.amount.value());
            }
        }
    }
}

fn put_varint(buf: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        buf.put_u8((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    buf.put_u8(value as u8);
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

struct Reader<'a> {
    buf: &'a [u8],
}

impl Reader<'_> {
    fn need(&self, n: usize, field: &'static str) -> Result<(), DecodeError> {
        if self.buf.remaining() < n {
            return Err(DecodeError::Truncated { field });
        }
        Ok(())
    }

    fn u8(&mut self, field: &'static str) -> Result<u8, DecodeError> {
        self.need(1, field)?;
        Ok(self.buf.get_u8())
    }

    fn u32_le(&mut self, field: &'static str) -> Result<u32, DecodeError> {
        self.need(4, field)?;
        Ok(self.buf.get_u32_le())
    }

    fn array<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N], DecodeError> {
        self.need(N, field)?;
        let mut out = [0u8; N];
        self.buf.copy_to_slice(&mut out);
        Ok(out)
    }

    fn varint(&mut self, field: &'static str) -> Result<u64, DecodeError> {
        let mut value = 0u64;
        for i in 0..MAX_VARINT_LENGTH {
            let byte = self.u8(field)?;
            let group = u64::from(byte & 0x7f);
            if i == MAX_VARINT_LENGTH - 1 && group > 1 {
                return Err(DecodeError::VarintOverflow { field });
            }
            value |= group << (7 * i);
            if byte & 0x80 == 0 {
                if byte == 0 && i > 0 {
                    return Err(DecodeError::NonCanonicalVarint { field });
                }
                return Ok(value);
            }
        }
        Err(DecodeError::VarintOverflow { field })
    }

    fn string(&mut self, field: &'static str) -> Result<String, DecodeError> {
        let len = self.varint(field)?;
        let len = usize::try_from(len).map_err(|_| DecodeError::Truncated { field })?;
        self.need(len, field)?;
        let (head, tail) = self.buf.split_at(len);
        self.buf = tail;
        String::from_utf8(head.to_vec()).map_err(|_| DecodeError::InvalidMemo)
    }

    fn address(&mut self, field: &'static str) -> Result<Address, DecodeError> {
        let raw = self.array::<ADDRESS_LENGTH>(field)?;
        Address::from_bytes(raw).map_err(|source| DecodeError::InvalidAddress { field, source })
    }

    fn amount(&mut self, field: &'static str) -> Result<Amount, DecodeError> {
        self.varint(field).map(Amount::new)
    }

    fn payload(&mut self) -> Result<Payload, DecodeError> {
        let type_byte = self.u8("payload type")?;
        let payload_type =
            PayloadType::from_byte(type_byte).ok_or(DecodeError::UnknownPayloadType(type_byte))?;

        let payload = match payload_type {
            PayloadType::Transfer => Payload::Transfer(TransferPayload {
                from: self.address("sender")?,
                to: self.address("receiver")?,
                amount: self.amount("amount")?,
            }),
            PayloadType::Bond => {
                let from = self.address("sender")?;
                let to = self.address("receiver")?;
                let public_key = match self.u8("public key length")? {
                    0 => None,
                    n if n as usize == PUBLIC_KEY_LENGTH => Some(NovaPublicKey::from_bytes(
                        self.array::<PUBLIC_KEY_LENGTH>("public key")?,
                    )?),
                    n => return Err(DecodeError::InvalidPublicKeyLength(n)),
                };
                Payload::Bond(BondPayload {
                    from,
                    to,
                    public_key,
                    stake: self.amount("stake")?,
                })
            }
            PayloadType::Sortition => Payload::Sortition(SortitionPayload {
                validator: self.address("validator")?,
                proof: self.array::<SORTITION_PROOF_LENGTH>("proof")?,
            }),
            PayloadType::Unbond => Payload::Unbond(UnbondPayload {
                validator: self.address("validator")?,
            }),
            PayloadType::Withdraw => Payload::Withdraw(WithdrawPayload {
                from: self.address("validator address")?,
                to: self.address("account address")?,
                amount: self.amount("amount")?,
            }),
            PayloadType::BatchTransfer => {
                let from = self.address("sender")?;
                let count = self.varint("recipient count")?;
                let mut recipients = Vec::new();
                for _ in 0..count {
                    recipients.push(Recipient {
                        to: self.address("recipient")?,
                        amount: self.amount("amount")?,
                    });
                }
                Payload::BatchTransfer(BatchTransferPayload { from, recipients })
            }
        };
        Ok(payload)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
