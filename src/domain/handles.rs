//! Nominal handle types.
//!
//! Every handle is an `i32` on the wire, but each kind is its own type so a
//! `Ped` can never be passed where a `Vehicle` is expected. There are no
//! conversions between handle kinds; going through the raw value is explicit.

use serde::{Deserialize, Serialize};

/// `DWORD` in declarations.
pub type Dword = i32;
/// `BOOL` in declarations (non-zero is true).
pub type Bool = i32;

/// Common surface of every handle newtype.
pub trait Handle: Copy + Eq + std::hash::Hash + std::fmt::Debug {
    /// Catalogue entry for this handle type.
    const KIND: HandleKind;

    fn from_raw(raw: i32) -> Self;
    fn raw(self) -> i32;
}

/// Asserts that no two of the listed handle types convert into each other.
#[cfg(test)]
macro_rules! assert_no_cross_conversions {
    () => {};
    ($first:ident $(, $rest:ident)*) => {
        $(
            static_assertions::assert_not_impl_any!($first: From<$rest>);
            static_assertions::assert_not_impl_any!($rest: From<$first>);
        )*
        assert_no_cross_conversions!($($rest),*);
    };
}

macro_rules! handles {
    ($($(#[$meta:meta])* $name:ident),+ $(,)?) => {
        $(
            $(#[$meta])*
            #[repr(transparent)]
            #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
            #[serde(transparent)]
            pub struct $name(i32);

            impl $name {
                pub const fn from_raw(raw: i32) -> Self {
                    Self(raw)
                }

                pub const fn raw(self) -> i32 {
                    self.0
                }
            }

            impl Handle for $name {
                const KIND: HandleKind = HandleKind::$name;

                fn from_raw(raw: i32) -> Self {
                    Self(raw)
                }

                fn raw(self) -> i32 {
                    self.0
                }
            }

            #[cfg(test)]
            static_assertions::assert_eq_size!($name, i32);
            #[cfg(test)]
            static_assertions::assert_not_impl_any!(
                $name: From<i32>, Into<i32>, From<u32>, std::ops::Deref, AsRef<i32>, From<crate::domain::Vector3>
            );
        )+

        #[cfg(test)]
        assert_no_cross_conversions!($($name),+);

        /// Catalogue of every declared handle type.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum HandleKind {
            $($name,)+
        }

        impl HandleKind {
            pub const ALL: &'static [HandleKind] = &[$(HandleKind::$name,)+];

            /// C spelling of the type.
            pub fn name(self) -> &'static str {
                match self {
                    $(HandleKind::$name => stringify!($name),)+
                }
            }

            /// Resolve a C spelling (case-sensitive, as in declarations).
            pub fn from_name(name: &str) -> Option<HandleKind> {
                match name {
                    $(stringify!($name) => Some(HandleKind::$name),)+
                    _ => None,
                }
            }
        }
    };
}

handles! {
    /// Untyped value slot, `typedef DWORD Void`.
    Void,
    /// Placeholder for parameters whose real type is unknown.
    Any,
    /// Joaat-style string hash.
    Hash,
    Entity,
    Player,
    FireId,
    Ped,
    Vehicle,
    Cam,
    CarGenerator,
    Group,
    Train,
    Pickup,
    Object,
    Weapon,
    Interior,
    Blip,
    Texture,
    TextureDict,
    CoverPoint,
    Camera,
    TaskSequence,
    ColourIndex,
    Sphere,
    ScrHandle,
    ItemSet,
    AnimScene,
    PersChar,
    PopZone,
    Prompt,
    PropSet,
    Volume,
}

impl HandleKind {
    /// `Void`, `Any` and `Hash` are declared through `DWORD`, the rest through `int`.
    pub fn is_dword_based(self) -> bool {
        matches!(self, HandleKind::Void | HandleKind::Any | HandleKind::Hash)
    }
}

impl std::fmt::Display for HandleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use static_assertions::assert_not_impl_any;

    // Spot checks on top of the per-type assertions generated by `handles!`.
    assert_not_impl_any!(Ped: From<Vehicle>, From<Entity>, Into<Entity>);
    assert_not_impl_any!(Entity: From<Ped>, From<Vehicle>, From<Object>);
    assert_not_impl_any!(Void: From<Any>, From<Hash>);

    #[test]
    fn catalogue_covers_every_declared_handle() {
        assert_eq!(HandleKind::ALL.len(), 32);
        for kind in HandleKind::ALL {
            assert_eq!(HandleKind::from_name(kind.name()), Some(*kind));
        }
        assert_eq!(HandleKind::from_name("ped"), None);
        assert_eq!(HandleKind::from_name("Vector3"), None);
    }

    #[test]
    fn raw_value_round_trips_explicitly() {
        let ped = Ped::from_raw(42);
        let vehicle = Vehicle::from_raw(ped.raw());
        assert_eq!(vehicle.raw(), 42);
        assert_eq!(<Ped as Handle>::KIND, HandleKind::Ped);
        assert_eq!(<Vehicle as Handle>::KIND, HandleKind::Vehicle);
    }

    #[test]
    fn handles_serialize_as_bare_integers() {
        let json = serde_json::to_string(&Blip::from_raw(-1)).unwrap();
        assert_eq!(json, "-1");
        let back: Blip = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Blip::from_raw(-1));
    }

    #[test]
    fn dword_based_handles() {
        assert!(HandleKind::Hash.is_dword_based());
        assert!(!HandleKind::Ped.is_dword_based());
    }
}
