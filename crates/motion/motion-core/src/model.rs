//! Model membership boundary.

/// Name-membership queries against a target 3D model. Copy and remap
/// operations on model-targeted channels use this to silently drop keyframes
/// whose bone/morph names the model does not define.
pub trait ModelObjects {
    fn contains_bone(&self, name: &str) -> bool;
    fn contains_morph(&self, name: &str) -> bool;
}
