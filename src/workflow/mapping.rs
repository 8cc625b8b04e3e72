use serde::{Deserialize, Serialize};

/// One left-to-right pairing in a one-to-one mapping widget.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct TaskConnection {
    pub left_id: String,
    pub right_id: String,
}

impl TaskConnection {
    pub fn new(left_id: impl Into<String>, right_id: impl Into<String>) -> Self {
        Self {
            left_id: left_id.into(),
            right_id: right_id.into(),
        }
    }
}

/// What a click on a mapping item did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SelectOutcome {
    Disconnected { left_id: String, right_id: String },
    Connected { left_id: String, right_id: String },
    Selected,
    Deselected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Click-to-match and drag-and-drop state for one mapping widget.
///
/// Each left id and each right id appears in at most one connection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskMappingEngine {
    connections: Vec<TaskConnection>,
    selected_left: Option<String>,
    selected_right: Option<String>,
    dragged_item: Option<String>,
}

impl TaskMappingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connections(&self) -> &[TaskConnection] {
        &self.connections
    }

    pub fn has_any_connections(&self) -> bool {
        !self.connections.is_empty()
    }

    pub fn selected_left(&self) -> Option<&str> {
        self.selected_left.as_deref()
    }

    pub fn selected_right(&self) -> Option<&str> {
        self.selected_right.as_deref()
    }

    pub fn dragged_item(&self) -> Option<&str> {
        self.dragged_item.as_deref()
    }

    pub fn connection_by_left(&self, left_id: &str) -> Option<&TaskConnection> {
        self.connections.iter().find(|c| c.left_id == left_id)
    }

    pub fn connection_by_right(&self, right_id: &str) -> Option<&TaskConnection> {
        self.connections.iter().find(|c| c.right_id == right_id)
    }

    /// Click on a left item.
    ///
    /// Unlinking requires the right-side selection to already be the
    /// connected partner; a lone click on a connected item only selects it.
    pub fn select_left(&mut self, id: &str) -> SelectOutcome {
        self.select(Side::Left, id)
    }

    /// Click on a right item. Mirror image of `select_left`.
    pub fn select_right(&mut self, id: &str) -> SelectOutcome {
        self.select(Side::Right, id)
    }

    fn select(&mut self, side: Side, id: &str) -> SelectOutcome {
        let (existing, opposite) = match side {
            Side::Left => (
                self.connection_by_left(id).cloned(),
                self.selected_right.clone(),
            ),
            Side::Right => (
                self.connection_by_right(id).cloned(),
                self.selected_left.clone(),
            ),
        };

        if let Some(conn) = existing {
            let partner = match side {
                Side::Left => &conn.right_id,
                Side::Right => &conn.left_id,
            };
            if opposite.as_deref() == Some(partner.as_str()) {
                self.disconnect_by_pair(&conn.left_id, &conn.right_id);
                self.clear_selection();
                return SelectOutcome::Disconnected {
                    left_id: conn.left_id,
                    right_id: conn.right_id,
                };
            }
        }

        if let Some(other) = opposite {
            let (left_id, right_id) = match side {
                Side::Left => (id.to_string(), other),
                Side::Right => (other, id.to_string()),
            };
            self.connect(&left_id, &right_id);
            return SelectOutcome::Connected { left_id, right_id };
        }

        let own = match side {
            Side::Left => &mut self.selected_left,
            Side::Right => &mut self.selected_right,
        };
        if own.as_deref() == Some(id) {
            *own = None;
            SelectOutcome::Deselected
        } else {
            *own = Some(id.to_string());
            SelectOutcome::Selected
        }
    }

    /// Pair `left_id` with `right_id`, dropping any connection that shares
    /// either endpoint. Clears both selections.
    pub fn connect(&mut self, left_id: &str, right_id: &str) {
        self.connections
            .retain(|c| c.left_id != left_id && c.right_id != right_id);
        self.connections.push(TaskConnection::new(left_id, right_id));
        self.clear_selection();
    }

    pub fn disconnect_by_pair(&mut self, left_id: &str, right_id: &str) {
        self.connections
            .retain(|c| !(c.left_id == left_id && c.right_id == right_id));
    }

    pub fn disconnect_by_left(&mut self, left_id: &str) {
        self.connections.retain(|c| c.left_id != left_id);
    }

    pub fn disconnect_by_right(&mut self, right_id: &str) {
        self.connections.retain(|c| c.right_id != right_id);
    }

    pub fn drag_start(&mut self, left_id: &str) {
        self.dragged_item = Some(left_id.to_string());
        self.selected_left = Some(left_id.to_string());
        self.selected_right = None;
    }

    /// Complete a drag onto `right_id`. Returns the new connection, or
    /// `None` when no drag was in progress. An empty dragged id counts as
    /// no drag.
    pub fn drop(&mut self, right_id: &str) -> Option<TaskConnection> {
        let left_id = self.dragged_item.take().filter(|id| !id.is_empty())?;
        self.connect(&left_id, right_id);
        Some(TaskConnection::new(left_id, right_id))
    }

    /// Cancelled or finished drag.
    pub fn drag_end(&mut self) {
        self.dragged_item = None;
    }

    /// Drop connections, selections and drag state.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn clear_selection(&mut self) {
        self.selected_left = None;
        self.selected_right = None;
    }
}
