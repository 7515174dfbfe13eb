use crate::parser::{
    analyzer::{NameKey, NormalizeContext},
    ast::{Query, ViewGraphLeaf},
};

pub struct ViewResolver;

impl ViewResolver {
    /// One view id per distinct object path. An object whose parent path
    /// already has a view is linked to it.
    pub fn assign_view_ids(ctx: &mut NormalizeContext, query: &mut Query, query_depth: usize) {
        let query_id = query.id;

        for object in query.from.iter_mut() {
            let view_id = match ctx.view_ids.get(&object.key) {
                Some(id) => *id,
                None => {
                    let id = ctx.take_view_id();
                    ctx.view_ids.insert(object.key.clone(), id);
                    id
                },
            };
            object.view_id = Some(view_id);

            let depth = object.name.len() + ctx.head_depth_offset;
            ctx.max_view_depth = ctx.max_view_depth.max(depth);

            if object.name.len() > 1 {
                let parent_key = NameKey::of_prefix(&object.name, object.name.len() - 1);
                if let Some(parent) = ctx.view_ids.get(&parent_key) {
                    object.parent_view_id = Some(*parent);
                }
            }

            ctx.view_graph.insert(view_id, ViewGraphLeaf {
                parent_view_id: object.parent_view_id,
                query_id,
                depth,
                query_depth,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{
        analyzer::{NormalizeContext, ViewResolver},
        ast::{ObjectInfo, Query},
    };

    fn object(name: &str) -> ObjectInfo {
        ObjectInfo {
            name: name.split('.').map(|segment| segment.to_string()).collect(),
            key: name.to_lowercase(),
            ..Default::default()
        }
    }

    #[test]
    pub fn test_views_link_to_their_parent() {
        let mut ctx = NormalizeContext::new(None);
        let mut query = Query {
            id: 1,
            from: vec![object("Contact"), object("Contact.Account"), object("Contact.Account.Owner")],
            ..Default::default()
        };

        ViewResolver::assign_view_ids(&mut ctx, &mut query, 1);

        let links: Vec<_> = query.from.iter().map(|object| (object.view_id, object.parent_view_id)).collect();
        assert_eq!(links, vec![(Some(1), None), (Some(2), Some(1)), (Some(3), Some(2))]);
        assert_eq!(ctx.max_view_depth, 3);
        assert_eq!(ctx.view_graph[&3].depth, 3);
        assert_eq!(ctx.next_view_id, 4);
    }

    #[test]
    pub fn test_known_paths_reuse_their_view() {
        let mut ctx = NormalizeContext::new(None);
        let mut root = Query { id: 1, from: vec![object("Contact")], ..Default::default() };
        ViewResolver::assign_view_ids(&mut ctx, &mut root, 1);

        ctx.head_depth_offset = 1;
        let mut sub_query = Query { id: 2, from: vec![object("contact"), object("Contact.Departments")], ..Default::default() };
        ViewResolver::assign_view_ids(&mut ctx, &mut sub_query, 2);

        assert_eq!(sub_query.from[0].view_id, Some(1));
        assert_eq!(sub_query.from[1].view_id, Some(2));
        assert_eq!(ctx.view_graph[&2].query_id, 2);
        assert_eq!(ctx.view_graph[&2].depth, 3);
    }
}
