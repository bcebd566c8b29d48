use crate::error::ModelError;
use crate::graph::Named;

/// Single-slot event channel between two behavioral automata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
  name: String,
  event: Option<String>,
}

impl Link {
  /// An empty link.
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      event: None,
    }
  }

  pub fn event(&self) -> Option<&str> {
    self.event.as_deref()
  }

  pub fn is_empty(&self) -> bool {
    self.event.is_none()
  }

  /// Place an event into the slot. The slot must be empty.
  pub fn fill(&mut self, event: impl Into<String>) -> Result<(), ModelError> {
    if let Some(current) = &self.event {
      return Err(ModelError::LinkOccupied {
        link: self.name.clone(),
        event: current.clone(),
      });
    }
    self.event = Some(event.into());
    Ok(())
  }

  /// Empty the slot, returning the event it held.
  pub fn take(&mut self) -> Option<String> {
    self.event.take()
  }
}

impl Named for Link {
  fn name(&self) -> &str {
    &self.name
  }
}
