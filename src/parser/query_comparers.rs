use crate::parser::{QueryParser, WordComparer};

#[derive(Debug)]
pub struct QueryComparers {
    pub select: WordComparer,
    pub from: WordComparer,
    pub r#where: WordComparer,
    pub group_by: WordComparer,
    pub having: WordComparer,
    pub order_by: WordComparer,
    pub offset: WordComparer,
    pub limit: WordComparer,
    pub r#for: WordComparer,
    pub asc: WordComparer,
    pub desc: WordComparer,
    pub nulls_first: WordComparer,
    pub nulls_last: WordComparer,
    pub and: WordComparer,
    pub or: WordComparer,
    pub not: WordComparer,
    pub equal: WordComparer,
    pub not_equal_b: WordComparer, // basic
    pub not_equal_c: WordComparer, // c
    pub greater_than: WordComparer,
    pub greater_than_or_equal: WordComparer,
    pub less_than: WordComparer,
    pub less_than_or_equal: WordComparer,
    pub like: WordComparer,
    pub not_like: WordComparer,
    pub r#in: WordComparer,
    pub not_in: WordComparer,
    pub includes: WordComparer,
    pub excludes: WordComparer,
    pub view: WordComparer,
    pub reference: WordComparer,
    pub update: WordComparer,
    pub tracking: WordComparer,
    pub viewstat: WordComparer,
    pub b_true: WordComparer,
    pub b_false: WordComparer,
    pub null: WordComparer,
    pub infinity: WordComparer,
    pub positive_infinity: WordComparer,
    pub negative_infinity: WordComparer,
    pub nan: WordComparer,
}

impl Default for QueryComparers {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryComparers {
    pub fn new() -> Self {
        Self {
            select: WordComparer::new("SELECT").with_word_boundary(),
            from: WordComparer::new("FROM").with_word_boundary(),
            r#where: WordComparer::new("WHERE").with_word_boundary(),
            group_by: WordComparer::new("GROUP BY").with_word_boundary(),
            having: WordComparer::new("HAVING").with_word_boundary(),
            order_by: WordComparer::new("ORDER BY").with_word_boundary(),
            offset: WordComparer::new("OFFSET").with_word_boundary(),
            limit: WordComparer::new("LIMIT").with_word_boundary(),
            r#for: WordComparer::new("FOR").with_word_boundary(),
            asc: WordComparer::new("ASC").with_word_boundary(),
            desc: WordComparer::new("DESC").with_word_boundary(),
            nulls_first: WordComparer::new("NULLS FIRST").with_word_boundary(),
            nulls_last: WordComparer::new("NULLS LAST").with_word_boundary(),
            and: WordComparer::new("AND").with_word_boundary(),
            or: WordComparer::new("OR").with_word_boundary(),
            not: WordComparer::new("NOT").with_word_boundary(),
            equal: WordComparer::new("="),
            not_equal_b: WordComparer::new("<>"),
            not_equal_c: WordComparer::new("!="),
            greater_than: WordComparer::new(">"),
            greater_than_or_equal: WordComparer::new(">="),
            less_than: WordComparer::new("<"),
            less_than_or_equal: WordComparer::new("<="),
            like: WordComparer::new("LIKE").with_word_boundary(),
            not_like: WordComparer::new("NOT LIKE").with_word_boundary(),
            r#in: WordComparer::new("IN").with_word_boundary(),
            not_in: WordComparer::new("NOT IN").with_word_boundary(),
            includes: WordComparer::new("INCLUDES").with_word_boundary(),
            excludes: WordComparer::new("EXCLUDES").with_word_boundary(),
            view: WordComparer::new("VIEW").with_word_boundary(),
            reference: WordComparer::new("REFERENCE").with_word_boundary(),
            update: WordComparer::new("UPDATE").with_word_boundary(),
            tracking: WordComparer::new("TRACKING").with_word_boundary(),
            viewstat: WordComparer::new("VIEWSTAT").with_word_boundary(),
            b_true: WordComparer::new("TRUE").with_word_boundary(),
            b_false: WordComparer::new("FALSE").with_word_boundary(),
            null: WordComparer::new("NULL").with_word_boundary(),
            infinity: WordComparer::new("INFINITY").with_word_boundary(),
            positive_infinity: WordComparer::new("+INFINITY").with_word_boundary(),
            negative_infinity: WordComparer::new("-INFINITY").with_word_boundary(),
            nan: WordComparer::new("NAN").with_word_boundary(),
        }
    }

    /// Clause keywords an identifier or alias may not shadow.
    pub fn reserved(&self) -> [&WordComparer; 9] {
        [
            &self.select,
            &self.from,
            &self.r#where,
            &self.group_by,
            &self.order_by,
            &self.having,
            &self.offset,
            &self.limit,
            &self.r#for,
        ]
    }

    pub fn is_reserved(&self, parser: &QueryParser) -> bool {
        self.reserved().iter().any(|comparer| comparer.compare(parser))
    }
}
