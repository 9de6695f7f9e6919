//! Layer tree reconstruction
//!
//! Layers are stored depth-first with a `child_level` per layer. A layer's
//! parent is the nearest earlier layer exactly one level shallower; level 0
//! layers are roots.

use crate::chunks::{LayerChunk, LayerType};

/// Parent index of `layers[index]`, scanning backward from it.
pub fn find_parent(layers: &[&LayerChunk], index: usize) -> Option<usize> {
    let level = layers.get(index)?.child_level;
    if level == 0 {
        return None;
    }
    (0..index)
        .rev()
        .find(|&i| layers[i].child_level == level - 1)
}

/// Resolved parent links over a document's layer list.
#[derive(Debug, Clone)]
pub struct Hierarchy<'a> {
    layers: Vec<&'a LayerChunk>,
    parents: Vec<Option<usize>>,
}

impl<'a> Hierarchy<'a> {
    pub fn new(layers: Vec<&'a LayerChunk>) -> Self {
        let parents = (0..layers.len()).map(|i| find_parent(&layers, i)).collect();
        Self { layers, parents }
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn layer(&self, index: usize) -> Option<&'a LayerChunk> {
        self.layers.get(index).copied()
    }

    pub fn layers(&self) -> &[&'a LayerChunk] {
        &self.layers
    }

    pub fn parent(&self, index: usize) -> Option<usize> {
        self.parents.get(index).copied().flatten()
    }

    /// Ancestors of `index`, nearest first.
    pub fn ancestors(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(self.parent(index), move |&i| self.parent(i))
    }

    /// Direct children of `index`, in layer order.
    pub fn children(&self, index: usize) -> Vec<usize> {
        (0..self.parents.len())
            .filter(|&i| self.parents[i] == Some(index))
            .collect()
    }

    /// Own visibility AND every ancestor's. Unknown indices are hidden.
    pub fn is_visible(&self, index: usize) -> bool {
        let Some(layer) = self.layer(index) else {
            return false;
        };
        layer.is_visible()
            && self
                .ancestors(index)
                .all(|i| self.layers[i].is_visible())
    }

    /// Whether cels on `index` are drawn at all: the layer must hold pixels
    /// and be effectively visible.
    pub fn is_renderable(&self, index: usize) -> bool {
        matches!(self.layer(index).map(|l| l.layer_type), Some(LayerType::Normal))
            && self.is_visible(index)
    }
}
