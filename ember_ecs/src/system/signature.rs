//! Utilities for signature of *systems* in ECS.

use crate::component::{component_id, Component};
use crate::error::ComponentLimitError;
use crate::Signature;

/// Set of component types which are required by the *system* in ECS.
///
/// Implemented for the unit type and for tuples of up to 12 components,
/// so `(Transform, RigidBody)` describes a system which needs both.
///
pub trait ComponentSet {
    /// Builds [`Signature`] of this set, registering unknown component types on the way.
    ///
    /// # Errors
    ///
    /// An error is returned if a component type cannot be registered.
    ///
    fn signature() -> Result<Signature, ComponentLimitError>;
}

impl ComponentSet for () {
    fn signature() -> Result<Signature, ComponentLimitError> {
        Ok(Signature::EMPTY)
    }
}

// Generate implementations of ComponentSet for tuples up to 12 elements.
macro_rules! impl_component_set {
    ($($name:ident),+) => {
        impl<$($name),+> ComponentSet for ($($name,)+)
        where
            $($name: Component,)+
        {
            fn signature() -> Result<Signature, ComponentLimitError> {
                let signature = Signature::EMPTY;
                $(let signature = signature.with(component_id::<$name>()?);)+
                Ok(signature)
            }
        }
    };
}

impl_component_set!(A);
impl_component_set!(A, B);
impl_component_set!(A, B, C);
impl_component_set!(A, B, C, D);
impl_component_set!(A, B, C, D, E);
impl_component_set!(A, B, C, D, E, F);
impl_component_set!(A, B, C, D, E, F, G);
impl_component_set!(A, B, C, D, E, F, G, H);
impl_component_set!(A, B, C, D, E, F, G, H, I);
impl_component_set!(A, B, C, D, E, F, G, H, I, J);
impl_component_set!(A, B, C, D, E, F, G, H, I, J, K);
impl_component_set!(A, B, C, D, E, F, G, H, I, J, K, L);
