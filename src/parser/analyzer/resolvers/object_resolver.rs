use std::collections::HashSet;

use crate::parser::{
    analyzer::{AliasMap, AnalyzerError, NameKey, QueryPlace},
    ast::{ObjectInfo, Query},
};

pub struct ObjectResolver;

impl ObjectResolver {
    /// Qualifies every FROM object against `primary` and registers the
    /// objects, their traversed prefixes and their aliases in `aliases`.
    ///
    /// Prefixes that were not declared are appended to `query.from` as
    /// implicit objects.
    pub fn resolve_from(
        query: &mut Query,
        place: QueryPlace,
        primary: &[String],
        aliases: &mut AliasMap,
    ) -> Result<(), AnalyzerError> {
        let mut object_aliases = HashSet::new();
        let declared = query.from.len();

        for index in 0..declared {
            let mut object = std::mem::take(&mut query.from[index]);

            let own_primary = index == 0 && place != QueryPlace::Select;
            if !own_primary && !aliases.contains_key(&NameKey::of_prefix(&object.name, 1)) {
                let mut name = primary.to_vec();
                name.append(&mut object.name);
                object.name = name;
            }

            Self::resolve_object(&mut object, query, aliases);

            if let Some(alias) = &object.alias {
                if !object_aliases.insert(alias.to_lowercase()) {
                    return AnalyzerError::DuplicateObjectAlias(alias.clone()).err();
                }
            }
            query.from[index] = object;
        }

        Ok(())
    }

    /// Replaces known leading segments (aliases included) with their
    /// qualified paths and registers each unknown prefix.
    fn resolve_object(object: &mut ObjectInfo, query: &mut Query, aliases: &mut AliasMap) {
        let mut current = object.name.clone();

        if let Some(qualified) = aliases.get(&NameKey::of_prefix(&current, 1)) {
            let mut name = qualified.clone();
            name.extend_from_slice(&current[1..]);
            current = name;
        }

        let mut index = 0;
        while index + 1 < current.len() {
            let prefix = &current[..=index];
            let key = NameKey::of(prefix);

            match aliases.get(&key) {
                Some(qualified) => {
                    let mut name = qualified.clone();
                    name.extend_from_slice(&current[index + 1..]);
                    current = name;
                },
                None => {
                    let implicit = prefix.to_vec();
                    aliases.insert(key.clone(), implicit.clone());
                    query.from.push(ObjectInfo { name: implicit, key, ..Default::default() });
                },
            }
            index += 1;
        }

        let key = NameKey::of(&current);
        aliases.insert(key.clone(), current.clone());

        if let Some(alias) = &object.alias {
            aliases.insert(alias.to_lowercase(), current.clone());

            // `Parent.alias` reaches the object through its parent path as well
            let mut aliased = current.clone();
            if let Some(last) = aliased.last_mut() {
                *last = alias.clone();
            }
            aliases.insert(NameKey::of(&aliased), current.clone());
        }

        object.name = current;
        object.key = key;
    }
}
