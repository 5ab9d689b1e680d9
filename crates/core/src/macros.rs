//! Declarative generation of property tables.

/// Implement [`ModelObject`](crate::ModelObject) for a struct whose listed
/// fields are all [`PropertyValue`](crate::PropertyValue)s.
///
/// Fields are archived in the order given. Fields left out of the list are
/// not part of the object's state (not compared, not archived).
///
/// The plain form also gives the type the default (accept everything)
/// [`PropertyChangeObserver`](crate::PropertyChangeObserver) hooks. Write
/// `custom hooks` after the class name to implement them yourself.
///
/// ```ignore
/// #[derive(Debug, Clone, Default)]
/// pub struct Tag {
///     name: String,
///     color: u32,
/// }
///
/// model_object!(Tag, "Tag", {
///     name: String,
///     color: u32,
/// });
///
/// model_object!(Note, "Note", custom hooks, { title: String });
/// impl PropertyChangeObserver for Note { /* ... */ }
/// ```
#[macro_export]
macro_rules! model_object {
    ($ty:ty, $class:expr, { $($field:ident : $fty:ty),* $(,)? }) => {
        $crate::model_object!($ty, $class, custom hooks, { $($field: $fty),* });

        impl $crate::PropertyChangeObserver for $ty {}
    };
    ($ty:ty, $class:expr, custom hooks, { $($field:ident : $fty:ty),* $(,)? }) => {
        impl $crate::ModelObject for $ty {
            const CLASS_NAME: &'static str = $class;

            fn properties() -> &'static [$crate::Property<Self>] {
                static PROPERTIES: &[$crate::Property<$ty>] = &[
                    $(
                        $crate::Property::new(
                            stringify!($field),
                            <$fty as $crate::PropertyValue>::KIND,
                            <$fty as $crate::PropertyValue>::OPTIONAL,
                            |m: &$ty| {
                                $crate::PropertyValue::into_value(
                                    ::core::clone::Clone::clone(&m.$field),
                                )
                            },
                            |m: &mut $ty, v: $crate::Value| {
                                m.$field = <$fty as $crate::PropertyValue>::from_value(
                                    stringify!($field),
                                    v,
                                )?;
                                Ok(())
                            },
                        ),
                    )*
                ];
                PROPERTIES
            }
        }
    };
}
