//! Setting component properties by name.
//!
//! [`App::set_properties`] applies `(name, value)` pairs through the regular
//! setters, so every change fires its event and schedules its repaint. It is
//! the entry point for declarative construction where the property set is
//! only known at run time.

use crate::app::App;
use crate::error::{Error, Result};
use crate::geometry::Insets;
use crate::tree::{ComponentId, Focusability};

/// A dynamically typed property value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Property {
    Int(i32),
    Bool(bool),
    Insets(Insets),
    /// Fixed preferred width and height; `None` leaves a dimension computed.
    PreferredSize(Option<i32>, Option<i32>),
}

impl Property {
    fn int(self, name: &str) -> Result<i32> {
        match self {
            Property::Int(v) => Ok(v),
            _ => Err(mismatch(name, "an integer")),
        }
    }

    fn bool(self, name: &str) -> Result<bool> {
        match self {
            Property::Bool(v) => Ok(v),
            _ => Err(mismatch(name, "a bool")),
        }
    }
}

impl From<i32> for Property {
    fn from(v: i32) -> Self {
        Property::Int(v)
    }
}

impl From<bool> for Property {
    fn from(v: bool) -> Self {
        Property::Bool(v)
    }
}

impl From<Insets> for Property {
    fn from(v: Insets) -> Self {
        Property::Insets(v)
    }
}

fn mismatch(name: &str, expected: &'static str) -> Error {
    Error::PropertyType { name: name.to_owned(), expected }
}

impl App {
    /// Apply properties in order. Stops at the first unknown name or type
    /// mismatch; properties before it stay applied.
    pub fn set_properties<'a, I>(&mut self, id: ComponentId, props: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a str, Property)>,
    {
        for (name, value) in props {
            self.set_property(id, name, value)?;
        }
        Ok(())
    }

    pub fn set_property(&mut self, id: ComponentId, name: &str, value: Property) -> Result<()> {
        let bounds = self.tree.require(id)?.bounds();
        match name {
            "x" => self.set_location(id, value.int(name)?, bounds.y),
            "y" => self.set_location(id, bounds.x, value.int(name)?),
            "width" => self.set_size(id, value.int(name)?, bounds.height),
            "height" => self.set_size(id, bounds.width, value.int(name)?),
            "visible" => self.set_visible(id, value.bool(name)?),
            "enabled" => self.set_enabled(id, value.bool(name)?),
            "focus_root" => self.set_focus_root(id, value.bool(name)?),
            "can_have_focus" => {
                let focusability = if value.bool(name)? {
                    Focusability::Always
                } else {
                    Focusability::Never
                };
                self.set_can_have_focus(id, focusability)
            }
            "padding" => match value {
                Property::Insets(insets) => self.set_padding(id, insets),
                Property::Int(all) => self.set_padding(id, Insets::all(all)),
                _ => Err(mismatch(name, "insets or an integer")),
            },
            "preferred_size" => match value {
                Property::PreferredSize(w, h) => self.set_preferred_size(id, w, h),
                _ => Err(mismatch(name, "a preferred size")),
            },
            _ => Err(Error::UnknownProperty(name.to_owned())),
        }
    }
}
