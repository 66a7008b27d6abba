//! Structural hashing of comparable values.
//!
//! A value is viewed as a tree of `Node`s, each carrying a type tag and one of a closed set of
//! shapes (`Value`). The tree is serialized into a canonical byte string, which is then hashed with
//! the default variant. The digests are therefore never compatible with hashing the bytes of a
//! value directly.
//!
//! Every node starts with its type tag, followed by:
//!
//! - integers: the value as 8 little-endian bytes (signed integers sign-extended),
//! - booleans: one byte, `0` or `1`,
//! - text: the raw bytes, without a length prefix,
//! - arrays and records: for every element, its index as 8 little-endian bytes followed by the
//!   element's node,
//! - floats: one zero byte if the value is zero (of either sign), 8 random bytes if it is NaN, and
//!   the IEEE-754 bits as 8 little-endian bytes otherwise. Complex numbers encode the real and then
//!   the imaginary part this way,
//! - identity references: the address as 8 little-endian bytes. The pointee is never visited, so
//!   raw pointers and `NonNull` to any type are accepted, tagged with the pointee's type name,
//! - variants: the node of the payload, or nothing if there is none.
//!
//! Note that hashing values containing NaN is not deterministic, and that hashing addresses ties
//! the digest to the running process.

use std::any;
use std::collections::{HashMap, HashSet};
use std::ptr::NonNull;

use byteorder::{ByteOrder, LittleEndian};

use {hash_with_seed, Error};

/// The shape of a comparable value.
pub enum Value<'a> {
    /// An integer, as its two's complement bits.
    Int(u64),
    /// A floating point number.
    Float(f64),
    /// A complex number, given by its real and imaginary parts.
    Complex(f64, f64),
    /// A boolean.
    Bool(bool),
    /// A string.
    Text(&'a str),
    /// A fixed-size array.
    Array(Vec<Node<'a>>),
    /// A record, with fields in declaration order.
    Record(Vec<Node<'a>>),
    /// An identity-based reference, given by its address.
    Pointer(usize),
    /// A sum type, holding the payload of the active variant (if any).
    Variant(Option<Box<Node<'a>>>),
    /// A value with no canonical encoding.
    Unsupported,
}

/// A typed value.
pub struct Node<'a> {
    /// The type tag.
    tag: String,
    /// The shape and content.
    value: Value<'a>,
}

impl<'a> Node<'a> {
    /// View some value as a node.
    pub fn of<T: Comparable + ?Sized>(v: &'a T) -> Node<'a> {
        let mut tag = String::new();
        T::type_tag(&mut tag);

        Node {
            tag: tag,
            value: v.to_value(),
        }
    }

    /// The type tag of the node.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The shape of the node.
    pub fn value(&self) -> &Value<'a> {
        &self.value
    }

    /// Append the canonical encoding of the node to `buf`.
    ///
    /// On error, `buf` may hold a partial encoding.
    pub fn encode(&self, buf: &mut Vec<u8>) -> Result<(), Error> {
        buf.extend_from_slice(self.tag.as_bytes());

        match self.value {
            Value::Int(x) => write_u64(buf, x),
            Value::Float(x) => write_float(buf, x),
            Value::Complex(re, im) => {
                write_float(buf, re);
                write_float(buf, im);
            },
            Value::Bool(x) => buf.push(x as u8),
            Value::Text(s) => buf.extend_from_slice(s.as_bytes()),
            Value::Array(ref nodes) | Value::Record(ref nodes) => {
                for (n, node) in nodes.iter().enumerate() {
                    write_u64(buf, n as u64);
                    node.encode(buf)?;
                }
            },
            Value::Pointer(addr) => write_u64(buf, addr as u64),
            Value::Variant(Some(ref node)) => node.encode(buf)?,
            Value::Variant(None) => {},
            Value::Unsupported => return Err(Error::UnsupportedType {
                tag: self.tag.clone(),
            }),
        }

        Ok(())
    }
}

/// Append an integer in little-endian.
fn write_u64(buf: &mut Vec<u8>, x: u64) {
    let mut bytes = [0; 8];
    LittleEndian::write_u64(&mut bytes, x);
    buf.extend_from_slice(&bytes);
}

/// Append a float.
fn write_float(buf: &mut Vec<u8>, x: f64) {
    if x == 0.0 {
        // Both signs of zero compare equal, so they must encode equally.
        buf.push(0);
    } else if x.is_nan() {
        write_u64(buf, ::rand::random());
    } else {
        write_u64(buf, x.to_bits());
    }
}

/// A value which can be hashed structurally.
///
/// Implement this for a struct with `comparable_record!`.
pub trait Comparable {
    /// Append the type tag of `Self` to `tag`.
    fn type_tag(tag: &mut String);

    /// View `self` as a structural value.
    fn to_value<'a>(&'a self) -> Value<'a>;
}

/// Encode some value canonically.
pub fn encode<T: Comparable + ?Sized>(v: &T) -> Result<Vec<u8>, Error> {
    let mut buf = Vec::with_capacity(256);
    Node::of(v).encode(&mut buf)?;

    Ok(buf)
}

/// Hash some value structurally with the default seed.
///
/// This fails if the value (or any part of it) has no canonical encoding.
pub fn hash_comparable<T: Comparable + ?Sized>(v: &T) -> Result<u64, Error> {
    hash_comparable_with_seed(v, 0)
}

/// Hash some value structurally according to a chosen seed.
pub fn hash_comparable_with_seed<T: Comparable + ?Sized>(v: &T, seed: u64) -> Result<u64, Error> {
    encode(v).map(|buf| hash_with_seed(&buf, seed))
}

/// Implement `Comparable` for a struct, as a record of the given fields.
///
/// The fields must be listed in declaration order, and the struct's name is used as the tag.
///
/// # Example
///
/// ```rust
/// #[macro_use]
/// extern crate rapidhash;
///
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// comparable_record!(Point { x, y });
///
/// fn main() {
///     let p = Point { x: 1, y: 2 };
///     assert_eq!(rapidhash::hash_comparable(&p), rapidhash::hash_comparable(&p));
/// }
/// ```
#[macro_export]
macro_rules! comparable_record {
    ($ty:ident { $($field:ident),* $(,)* }) => {
        impl $crate::Comparable for $ty {
            fn type_tag(tag: &mut ::std::string::String) {
                tag.push_str(stringify!($ty));
            }

            fn to_value<'a>(&'a self) -> $crate::Value<'a> {
                $crate::Value::Record(vec![$($crate::Node::of(&self.$field)),*])
            }
        }
    }
}

macro_rules! impl_int {
    ($($ty:ty),*) => {
        $(
            impl Comparable for $ty {
                fn type_tag(tag: &mut String) {
                    tag.push_str(stringify!($ty));
                }

                fn to_value<'a>(&'a self) -> Value<'a> {
                    // Widening through `i64` sign-extends the signed types.
                    Value::Int(*self as i64 as u64)
                }
            }
        )*
    }
}

impl_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Comparable for char {
    fn type_tag(tag: &mut String) {
        tag.push_str("char");
    }

    fn to_value<'a>(&'a self) -> Value<'a> {
        Value::Int(*self as u64)
    }
}

impl Comparable for bool {
    fn type_tag(tag: &mut String) {
        tag.push_str("bool");
    }

    fn to_value<'a>(&'a self) -> Value<'a> {
        Value::Bool(*self)
    }
}

impl Comparable for f32 {
    fn type_tag(tag: &mut String) {
        tag.push_str("f32");
    }

    fn to_value<'a>(&'a self) -> Value<'a> {
        Value::Float(*self as f64)
    }
}

impl Comparable for f64 {
    fn type_tag(tag: &mut String) {
        tag.push_str("f64");
    }

    fn to_value<'a>(&'a self) -> Value<'a> {
        Value::Float(*self)
    }
}

impl Comparable for str {
    fn type_tag(tag: &mut String) {
        tag.push_str("str");
    }

    fn to_value<'a>(&'a self) -> Value<'a> {
        Value::Text(self)
    }
}

impl Comparable for String {
    fn type_tag(tag: &mut String) {
        str::type_tag(tag);
    }

    fn to_value<'a>(&'a self) -> Value<'a> {
        Value::Text(self)
    }
}

impl<T: Comparable, const N: usize> Comparable for [T; N] {
    fn type_tag(tag: &mut String) {
        tag.push('[');
        T::type_tag(tag);
        tag.push_str("; ");
        tag.push_str(&N.to_string());
        tag.push(']');
    }

    fn to_value<'a>(&'a self) -> Value<'a> {
        Value::Array(self.iter().map(Node::of).collect())
    }
}

impl<T: Comparable> Comparable for Option<T> {
    fn type_tag(tag: &mut String) {
        tag.push_str("Option<");
        T::type_tag(tag);
        tag.push('>');
    }

    fn to_value<'a>(&'a self) -> Value<'a> {
        Value::Variant(self.as_ref().map(|v| Box::new(Node::of(v))))
    }
}

impl<'b, T: Comparable + ?Sized> Comparable for &'b T {
    fn type_tag(tag: &mut String) {
        T::type_tag(tag);
    }

    fn to_value<'a>(&'a self) -> Value<'a> {
        (**self).to_value()
    }
}

impl<T: Comparable + ?Sized> Comparable for Box<T> {
    fn type_tag(tag: &mut String) {
        T::type_tag(tag);
    }

    fn to_value<'a>(&'a self) -> Value<'a> {
        (**self).to_value()
    }
}

impl<T: ?Sized> Comparable for *const T {
    fn type_tag(tag: &mut String) {
        tag.push_str("*const ");
        tag.push_str(any::type_name::<T>());
    }

    fn to_value<'a>(&'a self) -> Value<'a> {
        Value::Pointer(self.cast::<u8>() as usize)
    }
}

impl<T: ?Sized> Comparable for *mut T {
    fn type_tag(tag: &mut String) {
        tag.push_str("*mut ");
        tag.push_str(any::type_name::<T>());
    }

    fn to_value<'a>(&'a self) -> Value<'a> {
        Value::Pointer(self.cast::<u8>() as usize)
    }
}

impl<T: ?Sized> Comparable for NonNull<T> {
    fn type_tag(tag: &mut String) {
        tag.push_str("NonNull<");
        tag.push_str(any::type_name::<T>());
        tag.push('>');
    }

    fn to_value<'a>(&'a self) -> Value<'a> {
        Value::Pointer(self.as_ptr().cast::<u8>() as usize)
    }
}

impl<K, V, S> Comparable for HashMap<K, V, S> {
    fn type_tag(tag: &mut String) {
        tag.push_str("HashMap");
    }

    fn to_value<'a>(&'a self) -> Value<'a> {
        // The iteration order is unspecified, so there is no canonical encoding.
        Value::Unsupported
    }
}

impl<T, S> Comparable for HashSet<T, S> {
    fn type_tag(tag: &mut String) {
        tag.push_str("HashSet");
    }

    fn to_value<'a>(&'a self) -> Value<'a> {
        Value::Unsupported
    }
}

impl Comparable for () {
    fn type_tag(tag: &mut String) {
        tag.push_str("()");
    }

    fn to_value<'a>(&'a self) -> Value<'a> {
        Value::Record(Vec::new())
    }
}

macro_rules! impl_tuple {
    ($first:ident $(, $rest:ident)*; $($n:tt),*) => {
        impl<$first: Comparable, $($rest: Comparable),*> Comparable for ($first, $($rest,)*) {
            fn type_tag(tag: &mut String) {
                tag.push('(');
                $first::type_tag(tag);
                $(
                    tag.push_str(", ");
                    $rest::type_tag(tag);
                )*
                tag.push(')');
            }

            fn to_value<'a>(&'a self) -> Value<'a> {
                Value::Record(vec![$(Node::of(&self.$n)),*])
            }
        }
    }
}

impl_tuple!(A; 0);
impl_tuple!(A, B; 0, 1);
impl_tuple!(A, B, C; 0, 1, 2);
impl_tuple!(A, B, C, D; 0, 1, 2, 3);
impl_tuple!(A, B, C, D, E; 0, 1, 2, 3, 4);
impl_tuple!(A, B, C, D, E, F; 0, 1, 2, 3, 4, 5);
