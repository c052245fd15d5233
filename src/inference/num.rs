use serde_json::Number;
use crate::ir::TypeKind;

/// Integral literals within `i32` are `Integer`, other integral literals are
/// `Long`, anything serde_json keeps as `f64` is `Float`.
pub fn classify_number(n: &Number) -> TypeKind {
    if let Some(i) = n.as_i64() {
        if i32::try_from(i).is_ok() { TypeKind::Integer } else { TypeKind::Long }
    } else if n.is_u64() {
        TypeKind::Long
    } else {
        TypeKind::Float
    }
}

/// Position on the widening chain `Integer < Long < Float`.
fn rank(kind: &TypeKind) -> Option<u8> {
    match kind {
        TypeKind::Integer => Some(0),
        TypeKind::Long => Some(1),
        TypeKind::Float => Some(2),
        _ => None,
    }
}

/// Wider of two numeric kinds; `None` unless both are numeric.
pub(super) fn widen(a: &TypeKind, b: &TypeKind) -> Option<TypeKind> {
    let (ra, rb) = (rank(a)?, rank(b)?);
    Some(if ra >= rb { a.clone() } else { b.clone() })
}
