/// Declare a struct whose fields carry `select`/`extract` directives and
/// implement [`Scrape`](crate::Scrape) for it.
///
/// ```
/// html_bind::scrape_record! {
///     #[derive(Debug, Default, Clone, PartialEq)]
///     pub struct Product {
///         #[select = "h2", extract = "text"]
///         pub name: String,
///         #[select = ".price", extract = "text"]
///         pub price: String,
///         #[select = "img", extract = "@src"]
///         pub image: Option<String>,
///     }
/// }
/// ```
///
/// Use an empty string to keep the inherited selection or to leave the extract
/// spec to nested fields.
///
/// A record may contain itself through `Option<Box<_>>` or `Vec<_>`. The
/// nested occurrence becomes a [`Shape::Deferred`](crate::Shape::Deferred)
/// and is expanded only where the document has matching nodes.
#[macro_export]
macro_rules! scrape_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                #[select = $select:literal, extract = $extract:literal]
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $( $field_vis $field: $ty, )*
        }

        impl $crate::Scrape for $name {
            fn shape() -> $crate::Shape {
                $crate::record_shape::<Self>(|| {
                    $crate::Shape::record(::std::vec![
                        $(
                            $crate::Field::new(
                                ::std::stringify!($field),
                                $select,
                                $extract,
                                <$ty as $crate::Scrape>::shape(),
                            ),
                        )*
                    ])
                })
            }

            fn to_value(&self) -> $crate::Value {
                $crate::Value::Record(::std::vec![
                    $(
                        (
                            ::std::string::String::from(::std::stringify!($field)),
                            $crate::Scrape::to_value(&self.$field),
                        ),
                    )*
                ])
            }

            #[allow(unused_mut)]
            fn from_value(
                value: $crate::Value,
            ) -> ::std::result::Result<Self, $crate::ScrapeError> {
                let mut reader = $crate::FieldReader::new(value)?;
                ::std::result::Result::Ok(Self {
                    $( $field: reader.next::<$ty>(::std::stringify!($field))?, )*
                })
            }
        }
    };
}
