//! Logical column types.

/// Logical types of the columnar schema.
///
/// `Undefined` is reserved for generated-program infrastructure handles
/// (hash tables, sort buffers) whose concrete type the target compiler
/// infers from context; it never appears in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    /// 32-bit signed integer.
    Integer,
    /// 64-bit signed integer.
    BigInt,
    /// IEEE-754 double.
    Double,
    /// One-byte character.
    Char,
    /// Borrowed byte span with value equality.
    String,
    Bool,
    /// 32-bit Julian-day integer.
    Date,
    Undefined,
}

impl Type {
    /// The spelling of this type in the generated program.
    ///
    /// # Panics
    ///
    /// Panics for `Undefined`: infrastructure handles are never declared
    /// through their type name.
    pub fn cpp_name(self) -> &'static str {
        match self {
            Type::Integer => "int32_t",
            Type::BigInt => "int64_t",
            Type::Double => "double",
            Type::Char => "char",
            Type::String => "std::string_view",
            Type::Bool => "bool",
            Type::Date => "date",
            Type::Undefined => panic!("Undefined type has no spelling"),
        }
    }
}
