//! Sidebar menu trees for the destination app.

use crate::ids::{TODAY_TAG_ID, new_id};
use crate::model::{EntityTable, MenuNode, Project, Tag};

/// All imported projects grouped under one folder, in table order.
pub fn project_tree(projects: &EntityTable<Project>, folder_title: &str) -> Vec<MenuNode> {
    if projects.is_empty() {
        return Vec::new();
    }
    let children = projects
        .ids
        .iter()
        .map(|id| MenuNode::Item { id: id.clone() })
        .collect();
    vec![MenuNode::Folder {
        id: new_id(),
        title: folder_title.to_string(),
        children,
    }]
}

/// Today pinned first, then every other tag under one folder.
///
/// The flat tag table puts Today last; the tree view is where it leads.
pub fn tag_tree(tags: &EntityTable<Tag>, folder_title: &str) -> Vec<MenuNode> {
    let children: Vec<MenuNode> = tags
        .ids
        .iter()
        .filter(|id| id.as_str() != TODAY_TAG_ID)
        .map(|id| MenuNode::Item { id: id.clone() })
        .collect();
    if children.is_empty() {
        return Vec::new();
    }
    vec![
        MenuNode::Item {
            id: TODAY_TAG_ID.to_string(),
        },
        MenuNode::Folder {
            id: new_id(),
            title: folder_title.to_string(),
            children,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Tag, Theme};
    use crate::time::now_ms;

    fn tag(id: &str, title: &str) -> Tag {
        Tag {
            id: id.to_string(),
            title: title.to_string(),
            task_ids: Vec::new(),
            created: now_ms(),
            modified: now_ms(),
            theme: Theme::with_color("#a05db1"),
            icon: None,
        }
    }

    #[test]
    fn empty_project_table_gives_empty_tree() {
        let projects: EntityTable<Project> = EntityTable::new();
        assert!(project_tree(&projects, "Imported").is_empty());
    }

    #[test]
    fn projects_nest_under_one_folder_in_order() {
        let mut projects = EntityTable::new();
        for title in ["Groceries", "Work"] {
            let p = Project {
                id: new_id(),
                title: title.to_string(),
                task_ids: Vec::new(),
                backlog_task_ids: Vec::new(),
                is_archived: false,
                is_enable_backlog: false,
                theme: Theme::with_color("#29a1aa"),
            };
            projects.insert(p.id.clone(), p);
        }

        let tree = project_tree(&projects, "Imported");
        assert_eq!(tree.len(), 1);
        let MenuNode::Folder { title, children, .. } = &tree[0] else {
            panic!("expected a folder node");
        };
        assert_eq!(title, "Imported");
        assert_eq!(children.len(), 2);
        for (child, expected) in children.iter().zip(&projects.ids) {
            let MenuNode::Item { id } = child else {
                panic!("expected an item node");
            };
            assert_eq!(id, expected);
        }
    }

    #[test]
    fn today_leads_the_tag_tree() {
        let mut tags = EntityTable::new();
        tags.insert("a".to_string(), tag("a", "errands"));
        tags.insert(TODAY_TAG_ID.to_string(), tag(TODAY_TAG_ID, "Today"));

        let tree = tag_tree(&tags, "Tags");
        assert_eq!(tree.len(), 2);
        assert!(matches!(&tree[0], MenuNode::Item { id } if id == TODAY_TAG_ID));
        let MenuNode::Folder { children, .. } = &tree[1] else {
            panic!("expected a folder node");
        };
        assert_eq!(children.len(), 1);
        assert!(matches!(&children[0], MenuNode::Item { id } if id == "a"));
    }

    #[test]
    fn only_today_means_no_tag_tree() {
        let mut tags = EntityTable::new();
        tags.insert(TODAY_TAG_ID.to_string(), tag(TODAY_TAG_ID, "Today"));
        assert!(tag_tree(&tags, "Tags").is_empty());
    }
}
