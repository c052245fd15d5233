use serde_json::Value;
use super::{unify_all, Classifier};
use crate::ir::TypeDescriptor;

impl Classifier<'_> {
    /// Folds every element into one element type. An empty array carries no
    /// evidence, so its element type is `Unconstrained`.
    pub(super) fn classify_array(&self, xs: &[Value]) -> TypeDescriptor {
        let elem = unify_all(xs.iter().map(|x| self.classify(x)))
            .unwrap_or_else(TypeDescriptor::unconstrained);
        TypeDescriptor::array(elem)
    }
}
