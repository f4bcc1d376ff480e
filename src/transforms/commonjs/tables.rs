//! Bookkeeping collected while scanning a module and consumed while
//! rewriting it. All tables preserve insertion order so the emitted code is
//! deterministic.

use std::hash::BuildHasherDefault;

use indexmap::{IndexMap, IndexSet};
use oxc_ast::{AstBuilder, ast::Expression};
use oxc_span::{Atom, Span};
use rustc_hash::FxHasher;

use super::{hoist::HoistPriority, templates};

type FxIndexMap<K, V> = IndexMap<K, V, BuildHasherDefault<FxHasher>>;
type FxIndexSet<K> = IndexSet<K, BuildHasherDefault<FxHasher>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Specifier<'a> {
    Default { local: Atom<'a> },
    Namespace { local: Atom<'a> },
    Named { local: Atom<'a>, imported: Atom<'a> },
}

#[derive(Debug)]
pub struct ImportEntry<'a> {
    pub specifiers: Vec<Specifier<'a>>,
    /// Greatest priority requested by any import of this path.
    pub hoist: HoistPriority,
    /// Location of the first import of this path.
    pub span: Span,
}

#[derive(Debug, Default)]
pub struct ImportTable<'a> {
    entries: FxIndexMap<Atom<'a>, ImportEntry<'a>>,
}

impl<'a> ImportTable<'a> {
    pub fn record(
        &mut self,
        source: Atom<'a>,
        span: Span,
        hoist: HoistPriority,
        specifiers: impl IntoIterator<Item = Specifier<'a>>,
    ) {
        let entry = self.entries.entry(source).or_insert_with(|| ImportEntry {
            specifiers: Vec::new(),
            hoist: HoistPriority::ORDINARY,
            span,
        });
        entry.specifiers.extend(specifiers);
        entry.hoist = entry.hoist.max(hoist);
    }

    pub fn span_of(&self, source: &str) -> Option<Span> {
        self.entries.get(source).map(|entry| entry.span)
    }

    pub fn into_entries(self) -> impl Iterator<Item = (Atom<'a>, ImportEntry<'a>)> {
        self.entries.into_iter()
    }
}

/// Local binding name -> the external names it is exported as.
#[derive(Debug, Default)]
pub struct ExportTable<'a> {
    names: FxIndexMap<Atom<'a>, Vec<Atom<'a>>>,
}

impl<'a> ExportTable<'a> {
    pub fn add(&mut self, local: Atom<'a>, exported: Atom<'a>) {
        self.names.entry(local).or_default().push(exported);
    }

    pub fn get(&self, local: &str) -> Option<&[Atom<'a>]> {
        self.names.get(local).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// What a remapped import name resolves to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Remap<'a> {
    /// The require binding itself.
    Binding(Atom<'a>),
    /// `object.property` on a require binding.
    Member { object: Atom<'a>, property: Atom<'a> },
}

impl<'a> Remap<'a> {
    pub fn to_expression(self, ast: AstBuilder<'a>) -> Expression<'a> {
        match self {
            Remap::Binding(name) => templates::identifier(ast, name),
            Remap::Member { object, property } => {
                templates::member_expression(ast, templates::identifier(ast, object), &property)
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct RemapTable<'a> {
    remaps: FxIndexMap<Atom<'a>, Remap<'a>>,
}

impl<'a> RemapTable<'a> {
    pub fn insert(&mut self, local: Atom<'a>, remap: Remap<'a>) {
        self.remaps.insert(local, remap);
    }

    pub fn get(&self, local: &str) -> Option<Remap<'a>> {
        self.remaps.get(local).copied()
    }

    pub fn len(&self) -> usize {
        self.remaps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaps.is_empty()
    }
}

/// Module path -> synthesized require binding.
#[derive(Debug, Default)]
pub struct RequireCache<'a> {
    bindings: FxIndexMap<Atom<'a>, Atom<'a>>,
}

impl<'a> RequireCache<'a> {
    pub fn get(&self, source: &str) -> Option<Atom<'a>> {
        self.bindings.get(source).copied()
    }

    pub fn insert(&mut self, source: Atom<'a>, binding: Atom<'a>) {
        self.bindings.insert(source, binding);
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }
}

/// Export names backed by declarations that are not function-hoisted.
#[derive(Debug, Default)]
pub struct NonHoistedExportNames<'a> {
    names: FxIndexSet<Atom<'a>>,
}

impl<'a> NonHoistedExportNames<'a> {
    pub fn insert(&mut self, name: Atom<'a>) {
        self.names.insert(name);
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Atom<'a>> + '_ {
        self.names.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn imports_merge_per_source_and_keep_first_location() {
        let mut table = ImportTable::default();
        let lodash = Atom::from("lodash");
        table.record(lodash, Span::new(0, 10), HoistPriority::ORDINARY, [Specifier::Default {
            local: Atom::from("_"),
        }]);
        table.record(Atom::from("react"), Span::new(11, 20), HoistPriority::ORDINARY, []);
        table.record(lodash, Span::new(21, 30), HoistPriority(4), [Specifier::Named {
            local: Atom::from("get"),
            imported: Atom::from("get"),
        }]);

        assert_eq!(table.span_of("lodash"), Some(Span::new(0, 10)));

        let entries: Vec<_> = table.into_entries().collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, "lodash");
        assert_eq!(entries[0].1.specifiers.len(), 2);
        assert_eq!(entries[0].1.hoist, HoistPriority(4));
        assert_eq!(entries[1].0, "react");
        assert!(entries[1].1.specifiers.is_empty());
    }

    #[test]
    fn one_local_can_fan_out_to_several_export_names() {
        let mut table = ExportTable::default();
        table.add(Atom::from("a"), Atom::from("a"));
        table.add(Atom::from("a"), Atom::from("b"));
        table.add(Atom::from("c"), Atom::from("default"));

        assert_eq!(table.get("a").unwrap(), [Atom::from("a"), Atom::from("b")]);
        assert_eq!(table.get("c").unwrap(), [Atom::from("default")]);
        assert!(table.get("d").is_none());
    }

    #[test]
    fn non_hoisted_names_are_unique_and_ordered() {
        let mut names = NonHoistedExportNames::default();
        names.insert(Atom::from("b"));
        names.insert(Atom::from("a"));
        names.insert(Atom::from("b"));
        let collected: Vec<_> = names.iter().map(|n| n.as_str().to_string()).collect();
        assert_eq!(collected, ["b", "a"]);
    }
}
