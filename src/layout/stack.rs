//! StackLayout: every visible child fills the content area.
//!
//! Canvases use it to keep their layers full-size.

use super::{content_area, visible_children, Constraint, Layout};
use crate::app::App;
use crate::error::Result;
use crate::geometry::Size;
use crate::tree::ComponentId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StackLayout;

impl StackLayout {
    pub fn new() -> Self {
        Self
    }
}

impl Layout for StackLayout {
    fn calc_preferred_size(&self, app: &mut App, target: ComponentId) -> Size {
        visible_children(app, target)
            .into_iter()
            .fold(Size::ZERO, |acc, child| acc.max(app.preferred_size(child)))
    }

    fn do_layout(&self, app: &mut App, target: ComponentId) -> Result<()> {
        let area = content_area(app, target);
        for child in visible_children(app, target) {
            app.set_bounds(child, area.x, area.y, area.width, area.height)?;
        }
        Ok(())
    }

    fn check_constraint(&self, constraint: Option<&Constraint>) -> Result<()> {
        match constraint {
            None | Some(Constraint::Center) => Ok(()),
            Some(c) => Err(self.invalid(c)),
        }
    }

    fn name(&self) -> &'static str {
        "StackLayout"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::App;
    use crate::geometry::{Insets, Rect};
    use crate::tree::Component;

    #[test]
    fn children_fill_content_area() {
        let mut app = App::default();
        let parent = app.create(
            Component::new()
                .with_layout(StackLayout)
                .with_bounds(0, 0, 100, 60)
                .with_padding(Insets::all(5)),
        );
        let a = app.create(Component::new());
        let b = app.create(Component::new().visible(false));
        app.add(parent, a).unwrap();
        app.add(parent, b).unwrap();
        app.validate(parent).unwrap();
        assert_eq!(app.tree().get(a).unwrap().bounds(), Rect::new(5, 5, 90, 50));
        assert_eq!(app.tree().get(b).unwrap().bounds(), Rect::EMPTY);
    }

    #[test]
    fn preferred_size_is_max_of_children() {
        let mut app = App::default();
        let parent = app.create(Component::new().with_layout(StackLayout));
        let a = app.create(Component::new().with_preferred_size(Some(30), Some(5)));
        let b = app.create(Component::new().with_preferred_size(Some(10), Some(25)));
        app.add(parent, a).unwrap();
        app.add(parent, b).unwrap();
        assert_eq!(app.preferred_size(parent), Size::new(30, 25));
    }

    #[test]
    fn rejects_positional_constraints() {
        assert!(StackLayout.check_constraint(Some(&Constraint::Center)).is_ok());
        assert!(StackLayout.check_constraint(Some(&Constraint::Top)).is_err());
    }
}
