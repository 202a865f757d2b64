use super::*;
use num_bigint::BigInt;

fn i64_ty() -> Type {
    Type::signed64(false)
}

#[test]
fn test_literal_rendering() {
    assert_eq!(Literal::boolean(true).to_string(), "true");
    assert_eq!(Literal::string("abc").to_string(), "\"abc\"");
    assert_eq!(Literal::double(1.5).to_string(), "64'f1.5");
    assert_eq!(Literal::double(2.0).to_string(), "64'f2.0");

    let ten = Literal::int(i64_ty(), BigInt::from(10)).unwrap();
    assert_eq!(ten.to_string(), "64'sd10");

    let neg = Literal::int(i64_ty(), BigInt::from(-3)).unwrap();
    assert_eq!(neg.to_string(), "-64'sd3");

    let bits = Literal::int(Type::bit_vector(8, false).unwrap(), BigInt::from(255)).unwrap();
    assert_eq!(bits.to_string(), "8'd255");
}

#[test]
fn test_string_literal_escaping() {
    let lit = Literal::string("say \"hi\" \\ bye");
    assert_eq!(lit.to_string(), r#""say \"hi\" \\ bye""#);
}

#[test]
fn test_nullable_literal_wrapped_in_some() {
    let lit = Literal::int(Type::signed64(true), BigInt::from(7)).unwrap();
    assert_eq!(lit.to_string(), "Some{64'sd7}");
}

#[test]
fn test_int_literal_range_checked() {
    let byte = Type::bit_vector(8, false).unwrap();
    assert!(Literal::int(byte.clone(), BigInt::from(256)).is_err());
    assert!(Literal::int(byte, BigInt::from(-1)).is_err());

    let small = Type::signed(4, false).unwrap();
    assert!(Literal::int(small.clone(), BigInt::from(-8)).is_ok());
    assert!(matches!(
        Literal::int(small, BigInt::from(8)),
        Err(IrError::LiteralOutOfRange { .. })
    ));
}

#[test]
fn test_int_literal_requires_bit_vector() {
    let err = Literal::int(Type::string(false), BigInt::from(1)).unwrap_err();
    assert!(matches!(err, IrError::NotBitVector { .. }));
}

#[test]
fn test_literal_accessors() {
    let lit = Literal::int(i64_ty(), BigInt::from(42)).unwrap();
    assert_eq!(lit.as_bigint(), Some(&BigInt::from(42)));
    assert_eq!(lit.as_f64(), None);
    assert_eq!(Literal::double(0.5).as_f64(), Some(0.5));
    assert!(matches!(
        Literal::boolean(false).value(),
        LiteralValue::Bool(false)
    ));
}

#[test]
fn test_binop_classes() {
    let comparisons: Vec<_> = BinOp::ALL.iter().filter(|op| op.is_comparison()).collect();
    assert_eq!(comparisons.len(), 6);
    assert!(BinOp::And.is_logical());
    assert!(BinOp::Mod.is_arithmetic());
    assert!(!BinOp::Concat.is_arithmetic());
    assert!(!BinOp::Concat.is_comparison());
}

#[test]
fn test_expression_rendering() {
    let a = Expr::field("v0", "a", i64_ty());
    let one: Expr = Literal::int(i64_ty(), BigInt::from(1)).unwrap().into();
    let sum = Expr::binary(BinOp::Plus, a.clone(), one, i64_ty());
    assert_eq!(sum.to_string(), "(v0.a + 64'sd1)");

    let cmp = Expr::binary(
        BinOp::Gt,
        sum,
        Expr::field("v1", "b", i64_ty()),
        Type::boolean(false),
    );
    assert_eq!(cmp.to_string(), "((v0.a + 64'sd1) > v1.b)");

    let not = Expr::unary(UnOp::Not, cmp, Type::boolean(false));
    assert_eq!(not.to_string(), "(not ((v0.a + 64'sd1) > v1.b))");

    let neg = Expr::unary(UnOp::Neg, a, i64_ty());
    assert_eq!(neg.to_string(), "(- v0.a)");
}

#[test]
fn test_call_cast_and_wrap_rendering() {
    let x = Expr::field("v0", "x", Type::signed64(true));
    let y = Expr::field("v0", "y", i64_ty());
    let call = Expr::call("eq_i64_NR", vec![y.clone(), x], Type::boolean(true));
    assert_eq!(call.to_string(), "eq_i64_NR(v0.y, v0.x)");

    let narrow = Expr::field("v0", "n", Type::signed(32, false).unwrap());
    let cast = Expr::cast(narrow, i64_ty());
    assert_eq!(cast.to_string(), "(v0.n as signed<64>)");

    let wrapped = Expr::wrap(y);
    assert_eq!(wrapped.to_string(), "Some{v0.y}");
    assert!(wrapped.ty().is_nullable());
}

#[test]
fn test_wrap_leaves_nullable_expression_alone() {
    let x = Expr::field("v0", "x", Type::string(true));
    assert_eq!(Expr::wrap(x.clone()), x);
}

#[test]
fn test_expression_type_is_carried() {
    let e = Expr::call("unwrap_bool", vec![], Type::boolean(false));
    assert!(e.ty().is_boolean());
    assert!(!e.ty().is_nullable());
}
