use std::collections::{BTreeMap, BTreeSet, HashSet};

use indexmap::IndexMap;
use tracing::trace;

use crate::{
    compiler::CompileError,
    parser::{
        analyzer::{
            AggregateResolver, AliasMap, AnalyzerError, ColumnResolver, FieldClause, FieldResolver, FieldScope,
            InternalError, NegationResolver, ObjectResolver, UnselectedResolver, ViewResolver,
        },
        ast::{Condition, FieldInfo, FieldKind, Query, QueryGraphLeaf, QueryMeta, ViewGraphLeaf},
    },
    planner::PerObjectPlanner,
};

/// How a query is reached from its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryPlace {
    Primary,
    /// `(SELECT ..)` in a field list, scoped to a relationship of the parent
    Select,
    /// subquery operand of a WHERE or HAVING comparison
    Conditional,
}

/// State of one normalization run. Counters are shared by the whole query
/// graph; the lookup maps are swapped out around conditional subqueries.
pub struct NormalizeContext {
    pub next_query_id: usize,
    pub next_view_id: usize,
    pub next_column_id: usize,
    /// object key -> view id
    pub view_ids: IndexMap<String, usize>,
    /// field key -> column id
    pub column_ids: IndexMap<String, usize>,
    /// field key -> position inside its object's per-object query
    pub col_indexes: IndexMap<String, usize>,
    pub head_depth_offset: usize,
    pub max_query_depth: usize,
    pub max_view_depth: usize,
    pub query_graph: BTreeMap<usize, QueryGraphLeaf>,
    pub view_graph: BTreeMap<usize, ViewGraphLeaf>,
    pub functions: BTreeSet<String>,
    pub parameters: BTreeSet<String>,
    pub date_time_literals: BTreeSet<String>,
    pub max_nesting_depth: Option<usize>,
}

fn conditions_mut(query: &mut Query, having: bool) -> &mut Vec<Condition> {
    if having { &mut query.having } else { &mut query.r#where }
}

impl NormalizeContext {
    pub fn new(max_nesting_depth: Option<usize>) -> Self {
        Self {
            next_query_id: 1,
            next_view_id: 1,
            next_column_id: 1,
            view_ids: IndexMap::new(),
            column_ids: IndexMap::new(),
            col_indexes: IndexMap::new(),
            head_depth_offset: 0,
            max_query_depth: 0,
            max_view_depth: 0,
            query_graph: BTreeMap::new(),
            view_graph: BTreeMap::new(),
            functions: BTreeSet::new(),
            parameters: BTreeSet::new(),
            date_time_literals: BTreeSet::new(),
            max_nesting_depth,
        }
    }

    pub fn take_query_id(&mut self) -> usize {
        let id = self.next_query_id;
        self.next_query_id += 1;
        id
    }

    pub fn take_view_id(&mut self) -> usize {
        let id = self.next_view_id;
        self.next_view_id += 1;
        id
    }

    pub fn take_column_id(&mut self) -> usize {
        let id = self.next_column_id;
        self.next_column_id += 1;
        id
    }

    /// Normalizes the root query and everything nested in it. Returns the
    /// graph metadata; compilation details are left for the caller to fill.
    pub fn normalize(mut self, query: &mut Query) -> Result<QueryMeta, CompileError> {
        self.normalize_query(query, QueryPlace::Primary, None, 1, None)?;

        Ok(QueryMeta {
            max_query_depth: self.max_query_depth,
            max_view_depth: self.max_view_depth,
            next_query_id: self.next_query_id,
            next_view_id: self.next_view_id,
            next_column_id: self.next_column_id,
            query_graph: self.query_graph,
            view_graph: self.view_graph,
            functions: self.functions,
            parameters: self.parameters,
            date_time_literals: self.date_time_literals,
            ..Default::default()
        })
    }

    pub fn normalize_query(
        &mut self,
        query: &mut Query,
        place: QueryPlace,
        parent: Option<&mut Query>,
        depth: usize,
        inherited: Option<&AliasMap>,
    ) -> Result<(), CompileError> {
        if let Some(max) = self.max_nesting_depth {
            if depth > max {
                return Err(AnalyzerError::NestingTooDeep { depth, max }.into());
            }
        }

        query.id = self.take_query_id();
        query.parent_id = parent.as_ref().map(|parent| parent.id);
        self.max_query_depth = self.max_query_depth.max(depth);
        self.query_graph.insert(query.id, QueryGraphLeaf {
            parent_id: query.parent_id,
            depth,
            is_conditional: place == QueryPlace::Conditional,
        });
        trace!(id = query.id, ?place, depth, "normalizing query");

        if query.from.is_empty() {
            return Err(InternalError::new(format!("The query {} has no from clause", query.id)).into());
        }

        let (primary, mut aliases) = match place {
            QueryPlace::Select => {
                let primary = parent.as_ref()
                    .and_then(|parent| parent.primary())
                    .map(|object| object.name.clone());
                let Some(primary) = primary else {
                    return Err(InternalError::new("The parent of a select subquery is missing").into());
                };
                (primary, inherited.cloned().unwrap_or_default())
            },
            QueryPlace::Primary | QueryPlace::Conditional => {
                let name = &query.from[0].name;
                if name.len() != 1 {
                    return Err(AnalyzerError::QualifiedPrimaryObject(name.join(".")).into());
                }
                (name.clone(), AliasMap::new())
            },
        };

        ObjectResolver::resolve_from(query, place, &primary, &mut aliases)?;

        let mut grouping = HashSet::new();
        for index in 0..query.group_by.len() {
            let mut field = std::mem::take(&mut query.group_by[index]);
            FieldResolver::resolve(self, &mut field, query, &mut aliases, &grouping, FieldScope::new(FieldClause::GroupBy))?;
            grouping.insert(field.key.clone());
            query.group_by[index] = field;
        }

        // a bare COUNT anywhere in the list makes every earlier field subject to grouping
        if query.fields.iter().any(AggregateResolver::contains_count) {
            query.is_aggregation = true;
        }

        let mut field_aliases: IndexMap<String, usize> = IndexMap::new();
        for index in 0..query.fields.len() {
            if !query.fields[index].is_sub_query() {
                let mut field = std::mem::take(&mut query.fields[index]);
                FieldResolver::resolve(self, &mut field, query, &mut aliases, &grouping, FieldScope::new(FieldClause::Select))?;
                query.fields[index] = field;
            }

            if let Some(alias) = &query.fields[index].alias {
                if field_aliases.insert(alias.to_lowercase(), index).is_some() {
                    return Err(AnalyzerError::DuplicateFieldAlias(alias.clone()).into());
                }
            }
        }

        let primary_len = query.from[0].name.len();
        for index in 0..query.group_by.len() {
            let alias = match query.group_by[index].name() {
                Some(name) if name.len() == primary_len + 1 => name[primary_len].to_lowercase(),
                _ => continue,
            };
            if let Some(select_index) = field_aliases.get(&alias).copied() {
                let replacement = query.fields[select_index].clone();
                grouping.remove(&query.group_by[index].key);
                grouping.insert(replacement.key.clone());
                query.group_by[index] = replacement;
            }
        }

        query.r#where = NegationResolver::distribute(&query.r#where)?;
        self.resolve_conditions(query, false, &mut aliases, &grouping)?;

        if !query.having.is_empty() {
            if query.group_by.is_empty() {
                return Err(AnalyzerError::HavingWithoutGroupBy(primary.join(".")).into());
            }
            query.having = NegationResolver::distribute(&query.having)?;
            self.resolve_conditions(query, true, &mut aliases, &grouping)?;
        }

        for index in 0..query.order_by.len() {
            let selected = match query.order_by[index].field.name() {
                Some([single]) => field_aliases.get(&single.to_lowercase()).copied(),
                _ => None,
            };
            match selected {
                Some(select_index) => query.order_by[index].field = query.fields[select_index].clone(),
                None => {
                    let mut field = std::mem::take(&mut query.order_by[index].field);
                    FieldResolver::resolve(self, &mut field, query, &mut aliases, &grouping, FieldScope::new(FieldClause::OrderBy))?;
                    query.order_by[index].field = field;
                },
            }
        }

        query.from[1..].sort_by_key(|object| object.name.len());

        UnselectedResolver::add_unselected_fields(query);
        ViewResolver::assign_view_ids(self, query, depth);

        ColumnResolver::assign_column_ids(self, query);
        ColumnResolver::assign_implicit_aliases(query, &field_aliases);
        ColumnResolver::check_duplicates(query)?;

        let correlated_parent = match place {
            QueryPlace::Select => parent,
            _ => None,
        };
        PerObjectPlanner::build(self, query, correlated_parent)?;

        for index in 0..query.fields.len() {
            let FieldKind::SubQuery(sub_query) = &mut query.fields[index].kind else {
                continue;
            };
            let mut sub_query = std::mem::take(sub_query);
            self.normalize_query(&mut sub_query, QueryPlace::Select, Some(&mut *query), depth + 1, Some(&aliases))?;
            query.fields[index].kind = FieldKind::SubQuery(sub_query);
        }

        for name in query.offset_and_limit.param_names() {
            self.parameters.insert(name.to_lowercase());
        }

        let saved_view_ids = std::mem::take(&mut self.view_ids);
        let saved_column_ids = std::mem::take(&mut self.column_ids);
        let saved_col_indexes = std::mem::take(&mut self.col_indexes);
        let saved_head_depth_offset = self.head_depth_offset;
        self.head_depth_offset = primary_len;

        let result = self.normalize_conditional_sub_queries(query, depth);

        self.view_ids = saved_view_ids;
        self.column_ids = saved_column_ids;
        self.col_indexes = saved_col_indexes;
        self.head_depth_offset = saved_head_depth_offset;

        result
    }

    fn resolve_conditions(
        &mut self,
        query: &mut Query,
        having: bool,
        aliases: &mut AliasMap,
        grouping: &HashSet<String>,
    ) -> Result<(), AnalyzerError> {
        let clause = if having { FieldClause::Having } else { FieldClause::Where };
        let mut conditions = std::mem::take(conditions_mut(query, having));

        for field in conditions.iter_mut().filter_map(Condition::operand_mut) {
            if !field.is_sub_query() {
                FieldResolver::resolve(self, field, query, aliases, grouping, FieldScope::new(clause))?;
            }
        }

        *conditions_mut(query, having) = conditions;
        Ok(())
    }

    fn normalize_conditional_sub_queries(&mut self, query: &mut Query, depth: usize) -> Result<(), CompileError> {
        for having in [false, true] {
            for index in 0..conditions_mut(query, having).len() {
                let sub_query = match conditions_mut(query, having)[index].operand_mut() {
                    Some(FieldInfo { kind: FieldKind::SubQuery(sub_query), .. }) => std::mem::take(sub_query),
                    _ => continue,
                };

                let mut sub_query = sub_query;
                self.normalize_query(&mut sub_query, QueryPlace::Conditional, Some(&mut *query), depth + 1, None)?;

                if let Some(field) = conditions_mut(query, having)[index].operand_mut() {
                    field.kind = FieldKind::SubQuery(sub_query);
                }
            }
        }
        Ok(())
    }
}
