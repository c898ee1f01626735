/// Load state of a tile's backing image.
///
/// The engine never fetches anything. The host kicks off its own image loads
/// and reports outcomes here; the render pass degrades failed tiles to
/// placeholder slots without disturbing layout or rotation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum AssetState {
    #[default]
    Pending,
    Ready,
    Failed,
}

#[derive(Debug, Clone, Default)]
pub struct TileAssets {
    states: Vec<AssetState>,
}

impl TileAssets {
    pub fn for_count(count: usize) -> Self {
        Self {
            states: vec![AssetState::Pending; count],
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Out-of-range reports are stale (the image list changed under the
    /// host's loader) and are dropped silently.
    pub fn mark_ready(&mut self, tile: usize) {
        if let Some(state) = self.states.get_mut(tile) {
            *state = AssetState::Ready;
        }
    }

    pub fn mark_failed(&mut self, tile: usize) {
        if let Some(state) = self.states.get_mut(tile) {
            *state = AssetState::Failed;
        }
    }

    pub fn state(&self, tile: usize) -> AssetState {
        self.states.get(tile).copied().unwrap_or_default()
    }
}
