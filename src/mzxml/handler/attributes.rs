use crate::mzxml::schema::{Attr, SchemaTable, Tag};

/// Which elements are currently open, counted per tag
///
/// A multiset rather than a stack: handlers ask "is any `instrument` open?"
/// instead of walking ancestors, and nested elements of the same kind (MS2
/// scans inside an MS1 scan) stay open until the outermost one closes.
#[derive(Debug, Clone)]
pub struct OpenTags {
    depth: [u16; Tag::COUNT],
    total: usize,
}

impl Default for OpenTags {
    fn default() -> Self {
        Self {
            depth: [0; Tag::COUNT],
            total: 0,
        }
    }
}

impl OpenTags {
    /// Record an opening tag
    pub fn open(&mut self, tag: Tag) {
        self.depth[tag.index()] = self.depth[tag.index()].saturating_add(1);
        self.total += 1;
    }

    /// Record a closing tag; `false` if no such tag was open
    pub fn close(&mut self, tag: Tag) -> bool {
        let slot = &mut self.depth[tag.index()];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        self.total -= 1;
        true
    }

    /// Whether at least one `tag` element is open
    pub fn contains(&self, tag: Tag) -> bool {
        self.depth[tag.index()] > 0
    }

    /// Number of open elements of kind `tag`
    pub fn depth(&self, tag: Tag) -> usize {
        self.depth[tag.index()] as usize
    }

    /// Total number of open elements
    pub fn len(&self) -> usize {
        self.total
    }

    /// Whether no element is open
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Attribute values of one start tag, resolved to codes once per event
pub struct AttributeValues<'a> {
    slots: [Option<&'a str>; Attr::COUNT],
    unknown: Vec<&'a str>,
}

impl<'a> AttributeValues<'a> {
    /// Resolve raw `(name, value)` pairs through `table`
    ///
    /// Names the table does not know are collected in [`unknown`](Self::unknown);
    /// namespace declarations other than the ones in the table are skipped.
    pub fn resolve<K, V>(table: &SchemaTable, raw: &'a [(K, V)]) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut values = AttributeValues {
            slots: [None; Attr::COUNT],
            unknown: Vec::new(),
        };
        for (name, value) in raw {
            let name = name.as_ref();
            match table.attr(name) {
                Some(attr) => values.slots[attr.index()] = Some(value.as_ref()),
                None if name.starts_with("xmlns:") => {}
                None => values.unknown.push(name),
            }
        }
        values
    }

    /// Value of an attribute, if present
    pub fn get(&self, attr: Attr) -> Option<&'a str> {
        self.slots[attr.index()]
    }

    /// Value of an attribute, or `""` when absent
    pub fn get_or_empty(&self, attr: Attr) -> &'a str {
        self.get(attr).unwrap_or("")
    }

    /// Present attributes in code order
    pub fn iter(&self) -> impl Iterator<Item = (Attr, &'a str)> + '_ {
        Attr::ALL
            .iter()
            .filter_map(move |&attr| self.get(attr).map(|value| (attr, value)))
    }

    /// Names the active schema does not define
    pub fn unknown(&self) -> &[&'a str] {
        &self.unknown
    }

    /// Whether no known attribute is present
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}
