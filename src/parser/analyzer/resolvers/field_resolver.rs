use std::collections::HashSet;

use crate::parser::{
    analyzer::{AggregateResolver, AliasMap, AnalyzerError, FunctionPlace, NameKey, NormalizeContext},
    ast::{FieldInfo, FieldKind, ListItem, Literal, ObjectInfo, Query},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldClause {
    Select,
    Where,
    GroupBy,
    Having,
    OrderBy,
}

/// Where a field is being resolved and what the resolution may do.
#[derive(Debug, Clone, Copy)]
pub struct FieldScope {
    pub clause: FieldClause,
    pub parameter: bool,
    /// unknown path prefixes may be registered as implicit FROM objects
    pub allow_unregistered: bool,
}

impl FieldScope {
    pub fn new(clause: FieldClause) -> Self {
        Self { clause, parameter: false, allow_unregistered: clause != FieldClause::OrderBy }
    }

    fn for_parameter(self) -> Self {
        Self { parameter: true, ..self }
    }

    fn is_select(&self) -> bool {
        self.clause == FieldClause::Select
    }

    fn is_having(&self) -> bool {
        self.clause == FieldClause::Having
    }
}

fn primary_path(query: &Query) -> Vec<String> {
    query.primary().map(|object| object.name.clone()).unwrap_or_default()
}

fn invalid_args(name: &str, reason: &str) -> AnalyzerError {
    AnalyzerError::InvalidFunctionArgs { name: name.to_string(), reason: reason.to_string() }
}

pub struct FieldResolver;

impl FieldResolver {
    /// Qualifies one field in place, validates its placement and records
    /// functions, parameters and date literals in the context.
    ///
    /// Subqueries are left alone; the query normalizer descends into them.
    pub fn resolve(
        ctx: &mut NormalizeContext,
        field: &mut FieldInfo,
        query: &mut Query,
        aliases: &mut AliasMap,
        grouping: &HashSet<String>,
        scope: FieldScope,
    ) -> Result<(), AnalyzerError> {
        match &field.kind {
            FieldKind::Field { .. } => Self::resolve_field(field, query, aliases, grouping, scope),
            FieldKind::Function { .. } => Self::resolve_function(ctx, field, query, aliases, grouping, scope),
            FieldKind::FieldSet { .. } if !scope.is_select() || scope.parameter => {
                let place = if scope.parameter { FunctionPlace::Nested } else { FunctionPlace::Conditional };
                AnalyzerError::FunctionNotAllowed { name: "FIELDS".into(), place }.err()
            },
            FieldKind::Parameter(name) => {
                ctx.parameters.insert(name.to_lowercase());
                Ok(())
            },
            FieldKind::DateTimeLiteral(literal) => {
                ctx.date_time_literals.insert(literal.name.to_uppercase());
                Ok(())
            },
            FieldKind::Literal(Literal::List(items)) => {
                for item in items {
                    match item {
                        ListItem::Parameter(name) => { ctx.parameters.insert(name.to_lowercase()); },
                        ListItem::DateTimeLiteral(literal) => { ctx.date_time_literals.insert(literal.name.to_uppercase()); },
                        ListItem::Literal(_) => {},
                    }
                }
                Ok(())
            },
            _ => Ok(()),
        }
    }

    /// Resolves `name` so that its object part is a registered, fully
    /// qualified path. Returns the path with the field segment appended.
    fn qualify_path(
        name: &[String],
        query: &mut Query,
        aliases: &mut AliasMap,
        allow_unregistered: bool,
    ) -> Result<Vec<String>, AnalyzerError> {
        let primary = primary_path(query);
        let mut current = name.to_vec();
        if current.len() == 1 {
            current = primary.iter().chain(name).cloned().collect();
        }

        let object = match aliases.get(&NameKey::of_prefix(&current, current.len() - 1)) {
            Some(qualified) => qualified.clone(),
            None => {
                if !aliases.contains_key(&NameKey::of_prefix(&current, 1)) {
                    current = primary.iter().chain(current.iter()).cloned().collect();
                }

                let mut index = 0;
                while index + 1 < current.len() {
                    let prefix = &current[..=index];
                    let key = NameKey::of(prefix);

                    match aliases.get(&key) {
                        Some(qualified) => {
                            let mut next = qualified.clone();
                            next.extend_from_slice(&current[index + 1..]);
                            current = next;
                        },
                        None if allow_unregistered => {
                            let implicit = prefix.to_vec();
                            aliases.insert(key.clone(), implicit.clone());
                            query.from.push(ObjectInfo { name: implicit, key, ..Default::default() });
                        },
                        None => {
                            return AnalyzerError::UnregisteredObject {
                                field: name.join("."),
                                primary: primary.join("."),
                            }.err();
                        },
                    }
                    index += 1;
                }

                let object_path = &current[..current.len() - 1];
                aliases.get(&NameKey::of(object_path)).cloned().unwrap_or_else(|| object_path.to_vec())
            },
        };

        let mut qualified = object;
        qualified.extend(current.last().cloned());
        Ok(qualified)
    }

    fn resolve_field(
        field: &mut FieldInfo,
        query: &mut Query,
        aliases: &mut AliasMap,
        grouping: &HashSet<String>,
        scope: FieldScope,
    ) -> Result<(), AnalyzerError> {
        let Some(name) = field.name().filter(|name| !name.is_empty()) else {
            return Ok(());
        };
        let qualified = Self::qualify_path(name, query, aliases, scope.allow_unregistered)?;
        let display = qualified.join(".");
        let primary = primary_path(query);

        if scope.is_select() {
            if !scope.parameter && qualified.len() <= primary.len() {
                return AnalyzerError::AncestorSelection { field: display, primary: primary.join(".") }.err();
            }
            if !NameKey::starts_with(&qualified, &primary) {
                return AnalyzerError::SiblingSelection { field: display, primary: primary.join(".") }.err();
            }
        }

        field.key = NameKey::of(&qualified);
        field.kind = FieldKind::Field { name: qualified };

        let checks_grouping = scope.is_having() || (scope.is_select() && query.is_aggregation);
        if !scope.parameter && checks_grouping && !AggregateResolver::is_grouped(field, &primary, grouping) {
            return AnalyzerError::UngroupedField(display).err();
        }
        Ok(())
    }

    fn resolve_function(
        ctx: &mut NormalizeContext,
        field: &mut FieldInfo,
        query: &mut Query,
        aliases: &mut AliasMap,
        grouping: &HashSet<String>,
        scope: FieldScope,
    ) -> Result<(), AnalyzerError> {
        let name = field.function_name().unwrap_or_default().to_string();
        let lower = name.to_lowercase();
        ctx.functions.insert(lower.clone());

        let rejected = match lower.as_str() {
            "fields" if scope.parameter => Some(FunctionPlace::Nested),
            "fields" if !scope.is_select() => Some(FunctionPlace::Conditional),
            "count" | "count_distinct" if !scope.is_select() && !scope.is_having() => Some(FunctionPlace::Conditional),
            "fields" if query.is_aggregation => Some(FunctionPlace::AggregationResult),
            _ => None,
        };
        if let Some(place) = rejected {
            return AnalyzerError::FunctionNotAllowed { name, place }.err();
        }

        let parameters = field.parameters();
        match lower.as_str() {
            "fields" => return Self::resolve_field_set(field, query, aliases),
            "count" => {
                if parameters.len() > 1 {
                    return invalid_args(&name, "requires 0 or 1 parameter").err();
                }
                if parameters.first().is_some_and(|parameter| !parameter.is_field()) {
                    return invalid_args(&name, "parameter must be a name").err();
                }
                query.is_aggregation = true;
            },
            "count_distinct" => {
                if parameters.len() != 1 {
                    return invalid_args(&name, "requires 1 parameter").err();
                }
                if !parameters[0].is_field() {
                    return invalid_args(&name, "parameter must be a name").err();
                }
                query.is_aggregation = true;
            },
            _ => {},
        }

        if let Some(parameters) = field.parameters_mut() {
            for parameter in parameters.iter_mut() {
                Self::resolve(ctx, parameter, query, aliases, grouping, scope.for_parameter())?;
            }
        }

        if scope.is_having() || (scope.is_select() && query.is_aggregation) {
            field.aggregated = AggregateResolver::is_count_name(&lower)
                || AggregateResolver::aggregates_fields(field.parameters());

            if !field.aggregated {
                let primary = primary_path(query);
                let ungrouped = field.parameters().iter()
                    .filter(|parameter| parameter.is_field() && !parameter.key.is_empty())
                    .find(|parameter| !AggregateResolver::is_grouped(parameter, &primary, grouping));
                if let Some(parameter) = ungrouped {
                    let display = parameter.name().unwrap_or_default().join(".");
                    return AnalyzerError::UngroupedField(display).err();
                }
            }
        }
        Ok(())
    }

    /// `FIELDS(x)` becomes a field set over the object `x` belongs to.
    fn resolve_field_set(field: &mut FieldInfo, query: &Query, aliases: &AliasMap) -> Result<(), AnalyzerError> {
        let name = field.function_name().unwrap_or_default().to_string();
        let target = match field.parameters() {
            [parameter] => match parameter.name() {
                Some(target) if parameter.is_field() && !target.is_empty() => target.to_vec(),
                _ => return invalid_args(&name, "parameter must be a name").err(),
            },
            _ => return invalid_args(&name, "requires a single parameter").err(),
        };

        let mut current = target;
        if current.len() == 1 {
            current = primary_path(query).into_iter().chain(current).collect();
        }

        let Some(object) = aliases.get(&NameKey::of_prefix(&current, current.len() - 1)) else {
            return AnalyzerError::UnknownFieldSetTarget(current.join(".")).err();
        };

        let mut qualified = object.clone();
        qualified.extend(current.last().cloned());

        field.key = NameKey::of(&qualified);
        field.kind = FieldKind::FieldSet { name: qualified };
        field.alias = None;
        Ok(())
    }
}
