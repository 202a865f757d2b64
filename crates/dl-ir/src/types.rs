//! Scalar type system for the DDlog IR

use crate::error::{IrError, IrResult};
use crate::expr::{Literal, LiteralValue};
use num_bigint::BigInt;
use num_traits::{One, Zero};
use std::hash::{Hash, Hasher};

/// Position of a statement in the translator's statement log.
///
/// Types and declarations keep this as a diagnostic back-reference only;
/// it is resolved through the translator, never dereferenced directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Scalar type variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// `bool`
    Boolean,
    /// Unsigned bit-vector, `bit<width>`
    Bit { width: u32 },
    /// Signed bit-vector, `signed<width>`
    Signed { width: u32 },
    /// `string`
    String,
    /// `double`
    Double,
    /// `Date` from the `time` library
    Date,
    /// `Time` from the `time` library
    Time,
    /// `DateTime` from the `time` library
    DateTime,
}

/// A scalar IR type with a nullability attribute.
///
/// Equality and hashing look at the variant and its width only: a nullable
/// and a non-nullable `signed<64>` compare equal. Use [`Type::strict_eq`]
/// where the rendered type must match exactly.
#[derive(Debug, Clone)]
pub struct Type {
    kind: TypeKind,
    nullable: bool,
    origin: Option<NodeId>,
}

/// Width of the signed alias every SQL integer column maps to
pub const SIGNED_ALIAS_WIDTH: u32 = 64;

impl Type {
    /// Build a type from a kind, rejecting zero-width bit-vectors
    pub fn from_kind(kind: TypeKind, nullable: bool) -> IrResult<Self> {
        if let TypeKind::Bit { width } | TypeKind::Signed { width } = kind {
            if width == 0 {
                return Err(IrError::InvalidWidth { width });
            }
        }
        Ok(Self {
            kind,
            nullable,
            origin: None,
        })
    }

    fn scalar(kind: TypeKind, nullable: bool) -> Self {
        Self {
            kind,
            nullable,
            origin: None,
        }
    }

    pub fn boolean(nullable: bool) -> Self {
        Self::scalar(TypeKind::Boolean, nullable)
    }

    pub fn string(nullable: bool) -> Self {
        Self::scalar(TypeKind::String, nullable)
    }

    pub fn double(nullable: bool) -> Self {
        Self::scalar(TypeKind::Double, nullable)
    }

    pub fn date(nullable: bool) -> Self {
        Self::scalar(TypeKind::Date, nullable)
    }

    pub fn time(nullable: bool) -> Self {
        Self::scalar(TypeKind::Time, nullable)
    }

    pub fn date_time(nullable: bool) -> Self {
        Self::scalar(TypeKind::DateTime, nullable)
    }

    /// Unsigned bit-vector of `width` bits; fails if `width` is zero
    pub fn bit_vector(width: u32, nullable: bool) -> IrResult<Self> {
        Self::from_kind(TypeKind::Bit { width }, nullable)
    }

    /// Signed bit-vector of `width` bits; fails if `width` is zero
    pub fn signed(width: u32, nullable: bool) -> IrResult<Self> {
        Self::from_kind(TypeKind::Signed { width }, nullable)
    }

    /// The `signed<64>` alias
    pub fn signed64(nullable: bool) -> Self {
        Self::scalar(
            TypeKind::Signed {
                width: SIGNED_ALIAS_WIDTH,
            },
            nullable,
        )
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Statement this type was created for, if recorded
    pub fn origin(&self) -> Option<NodeId> {
        self.origin
    }

    /// Copy of this type with a different nullability attribute
    pub fn with_nullable(&self, nullable: bool) -> Self {
        Self {
            nullable,
            ..self.clone()
        }
    }

    /// Copy of this type tagged with the statement it came from
    pub fn with_origin(&self, origin: NodeId) -> Self {
        Self {
            origin: Some(origin),
            ..self.clone()
        }
    }

    /// Copy of a bit-vector type with a new width, keeping nullability
    pub fn with_width(&self, width: u32) -> IrResult<Self> {
        let kind = match self.kind {
            TypeKind::Bit { .. } => TypeKind::Bit { width },
            TypeKind::Signed { .. } => TypeKind::Signed { width },
            _ => {
                return Err(IrError::NotBitVector {
                    ty: self.to_string(),
                })
            }
        };
        let mut widened = Self::from_kind(kind, self.nullable)?;
        widened.origin = self.origin;
        Ok(widened)
    }

    /// Width of a bit-vector type
    pub fn width(&self) -> Option<u32> {
        match self.kind {
            TypeKind::Bit { width } | TypeKind::Signed { width } => Some(width),
            _ => None,
        }
    }

    pub fn is_bit_vector(&self) -> bool {
        matches!(self.kind, TypeKind::Bit { .. } | TypeKind::Signed { .. })
    }

    pub fn is_numeric(&self) -> bool {
        self.is_bit_vector() || matches!(self.kind, TypeKind::Double)
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self.kind, TypeKind::Boolean)
    }

    pub fn is_string(&self) -> bool {
        matches!(self.kind, TypeKind::String)
    }

    /// Equality including the nullability attribute
    pub fn strict_eq(&self, other: &Type) -> bool {
        self == other && self.nullable == other.nullable
    }

    /// Base type name without the `Option` wrapper
    pub fn canonical_name(&self) -> String {
        match self.kind {
            TypeKind::Boolean => "bool".into(),
            TypeKind::Bit { width } => format!("bit<{width}>"),
            TypeKind::Signed { width } => format!("signed<{width}>"),
            TypeKind::String => "string".into(),
            TypeKind::Double => "double".into(),
            TypeKind::Date => "Date".into(),
            TypeKind::Time => "Time".into(),
            TypeKind::DateTime => "DateTime".into(),
        }
    }

    /// Additive identity, typed exactly like `self`
    pub fn zero(&self) -> IrResult<Literal> {
        match self.kind {
            TypeKind::Bit { .. } | TypeKind::Signed { .. } => Ok(Literal::typed(
                self.clone(),
                LiteralValue::Int(BigInt::zero()),
            )),
            TypeKind::Double => Ok(Literal::typed(self.clone(), LiteralValue::Float(0.0))),
            _ => Err(IrError::NotNumeric {
                ty: self.to_string(),
            }),
        }
    }

    /// Multiplicative identity, typed exactly like `self`
    pub fn one(&self) -> IrResult<Literal> {
        match self.kind {
            TypeKind::Bit { .. } | TypeKind::Signed { .. } => Ok(Literal::typed(
                self.clone(),
                LiteralValue::Int(BigInt::one()),
            )),
            TypeKind::Double => Ok(Literal::typed(self.clone(), LiteralValue::Float(1.0))),
            _ => Err(IrError::NotNumeric {
                ty: self.to_string(),
            }),
        }
    }

    /// Inclusive value range of a bit-vector type
    pub fn bounds(&self) -> Option<(BigInt, BigInt)> {
        match self.kind {
            TypeKind::Bit { width } => {
                let max = (BigInt::one() << width as usize) - BigInt::one();
                Some((BigInt::zero(), max))
            }
            TypeKind::Signed { width } => {
                let half = BigInt::one() << (width as usize - 1);
                Some((-half.clone(), half - BigInt::one()))
            }
            _ => None,
        }
    }
}

/// The wider of two bit-vectors of the same signedness; nullable if either is
pub fn widest(a: &Type, b: &Type) -> Option<Type> {
    let wider = match (a.kind, b.kind) {
        (TypeKind::Bit { width: wa }, TypeKind::Bit { width: wb })
        | (TypeKind::Signed { width: wa }, TypeKind::Signed { width: wb }) => {
            if wa >= wb {
                a
            } else {
                b
            }
        }
        _ => return None,
    };
    Some(wider.with_nullable(a.nullable || b.nullable))
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for Type {}

impl Hash for Type {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.nullable {
            write!(f, "Option<{}>", self.canonical_name())
        } else {
            f.write_str(&self.canonical_name())
        }
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
