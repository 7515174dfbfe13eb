use std::fmt::{self, Display};

use crate::parser::ast::{DateTimeLiteral, ListItem, Literal, Query};

/// One field-like node: a select item, a condition operand, a grouping key
/// or a function parameter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldInfo {
    pub kind: FieldKind,
    pub alias: Option<String>,
    pub not_selected: bool,
    pub aggregated: bool,
    /// canonical case-insensitive identity, set during normalization
    pub key: String,
    pub column_id: Option<usize>,
    pub col_index: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Field { name: Vec<String> },
    FieldSet { name: Vec<String> },
    Function { name: String, parameters: Vec<FieldInfo> },
    SubQuery(Box<Query>),
    Literal(Literal),
    Parameter(String),
    DateTimeLiteral(DateTimeLiteral),
}

impl Default for FieldKind {
    fn default() -> Self {
        FieldKind::Literal(Literal::Null)
    }
}

impl From<ListItem> for FieldKind {
    fn from(item: ListItem) -> Self {
        match item {
            ListItem::Literal(literal) => FieldKind::Literal(literal),
            ListItem::Parameter(name) => FieldKind::Parameter(name),
            ListItem::DateTimeLiteral(literal) => FieldKind::DateTimeLiteral(literal),
        }
    }
}

impl FieldKind {
    /// Discriminant name used by the wire form.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Field { .. } => "Field",
            FieldKind::FieldSet { .. } => "FieldSet",
            FieldKind::Function { .. } => "Function",
            FieldKind::SubQuery(_) => "SubQuery",
            FieldKind::Literal(literal) => literal.type_name(),
            FieldKind::Parameter(_) => "ParameterizedValue",
            FieldKind::DateTimeLiteral(_) => "DateTimeLiteralName",
        }
    }
}

impl FieldInfo {
    pub fn new(kind: FieldKind) -> Self {
        Self { kind, ..Default::default() }
    }

    pub fn field(name: Vec<String>) -> Self {
        Self::new(FieldKind::Field { name })
    }

    pub fn function(name: &str, parameters: Vec<FieldInfo>) -> Self {
        Self::new(FieldKind::Function { name: name.to_string(), parameters })
    }

    pub fn sub_query(query: Query) -> Self {
        Self::new(FieldKind::SubQuery(Box::new(query)))
    }

    pub fn literal(literal: Literal) -> Self {
        Self::new(FieldKind::Literal(literal))
    }

    pub fn with_alias(mut self, alias: Option<String>) -> Self {
        self.alias = alias;
        self
    }

    pub fn is_field(&self) -> bool {
        matches!(self.kind, FieldKind::Field { .. })
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, FieldKind::Function { .. })
    }

    pub fn is_sub_query(&self) -> bool {
        matches!(self.kind, FieldKind::SubQuery(_))
    }

    /// Path of a Field or FieldSet node.
    pub fn name(&self) -> Option<&[String]> {
        match &self.kind {
            FieldKind::Field { name } | FieldKind::FieldSet { name } => Some(name),
            _ => None,
        }
    }

    pub fn function_name(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::Function { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn parameters(&self) -> &[FieldInfo] {
        match &self.kind {
            FieldKind::Function { parameters, .. } => parameters,
            _ => &[],
        }
    }

    pub fn parameters_mut(&mut self) -> Option<&mut Vec<FieldInfo>> {
        match &mut self.kind {
            FieldKind::Function { parameters, .. } => Some(parameters),
            _ => None,
        }
    }

    /// Object path a Field or FieldSet belongs to, i.e. its name without the last segment.
    pub fn object_path(&self) -> Option<&[String]> {
        self.name().map(|name| &name[..name.len().saturating_sub(1)])
    }
}

impl Display for FieldInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            FieldKind::Field { name } => write!(f, "{}", name.join(".")),
            FieldKind::FieldSet { name } => write!(f, "FIELDS({})", name.join(".")),
            FieldKind::Function { name, parameters } => {
                write!(f, "{}(", name)?;
                for (index, parameter) in parameters.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", parameter)?;
                }
                write!(f, ")")
            },
            FieldKind::SubQuery(query) => write!(f, "({})", query),
            FieldKind::Literal(literal) => write!(f, "{}", literal),
            FieldKind::Parameter(name) => write!(f, ":{}", name),
            FieldKind::DateTimeLiteral(literal) => write!(f, "{}", literal),
        }?;

        if let Some(alias) = &self.alias {
            write!(f, " {}", alias)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::{FieldInfo, FieldKind, Literal};

    fn name(text: &str) -> Vec<String> {
        text.split('.').map(|segment| segment.to_string()).collect()
    }

    #[test]
    pub fn test_type_names() {
        assert_eq!(FieldInfo::field(name("a")).kind.type_name(), "Field");
        assert_eq!(FieldInfo::function("count", vec![]).kind.type_name(), "Function");
        assert_eq!(FieldInfo::literal(Literal::Int(1)).kind.type_name(), "Int");
        assert_eq!(FieldKind::Parameter("p".into()).type_name(), "ParameterizedValue");
    }

    #[test]
    pub fn test_object_path() {
        let field = FieldInfo::field(name("Contact.Account.Name"));

        assert_eq!(field.object_path(), Some(&name("Contact.Account")[..]));
        assert_eq!(FieldInfo::function("count", vec![]).object_path(), None);
    }

    #[test]
    pub fn test_display() {
        let field = FieldInfo::function("MAX", vec![FieldInfo::field(name("acc.Amount"))])
            .with_alias(Some("top".into()));

        assert_eq!(field.to_string(), "MAX(acc.Amount) top");
    }
}
