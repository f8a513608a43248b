//
// Copyright 2022-Present (c) Raja Lehtihet & Wael El Oraiby
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice,
// this list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
// this list of conditions and the following disclaimer in the documentation
// and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its contributors
// may be used to endorse or promote products derived from this software without
// specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE
// ARE DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE
// LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR
// CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF
// SUBSTITUTE GOODS OR SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS
// INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN
// CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE)
// ARISING IN ANY WAY OUT OF THE USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE
// POSSIBILITY OF SUCH DAMAGE.
//
use std::collections::HashSet;

use crate::*;

/// Child indices leading from the roots to a node; `[1, 0]` is the first child of the second root.
pub type HierarchyPath = Vec<usize>;

#[derive(Clone, Debug, Default, PartialEq)]
/// A labelled node of a hierarchy. Nodes are keyed by their index path, so siblings may share a
/// label.
pub struct HierarchyNode {
    /// Displayed label.
    pub label: String,
    /// Child nodes, shown while the node is expanded.
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    /// Node without children.
    pub fn leaf(label: &str) -> Self { Self { label: label.to_string(), children: Vec::new() } }

    /// Node with `children`.
    pub fn branch(label: &str, children: Vec<HierarchyNode>) -> Self { Self { label: label.to_string(), children } }

    /// Node at `path` below `roots`.
    pub fn at<'a>(roots: &'a [HierarchyNode], path: &[usize]) -> Option<&'a HierarchyNode> {
        let (first, rest) = path.split_first()?;
        rest.iter().try_fold(roots.get(*first)?, |node, i| node.children.get(*i))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Outcome of [`UIDrawer::hierarchy`].
pub struct HierarchyResponse {
    /// Index path of the selected node.
    pub selected: Option<HierarchyPath>,
    /// `true` on the draw that applied a new selection.
    pub changed: bool,
}

#[derive(Clone, Debug, Default)]
/// Persistent state of a hierarchy: expanded paths and the selection.
pub struct HierarchyState {
    expanded: HashSet<HierarchyPath>,
    selected: Option<HierarchyPath>,
    pending_toggles: Vec<HierarchyPath>,
    pending_select: Option<HierarchyPath>,
}

impl HierarchyState {
    /// Returns `true` when the node at `path` shows its children.
    pub fn is_expanded(&self, path: &[usize]) -> bool { self.expanded.contains(path) }

    /// Expands or collapses the node at `path`.
    pub fn set_expanded(&mut self, path: &[usize], expanded: bool) {
        if expanded {
            self.expanded.insert(path.to_vec());
        } else {
            self.expanded.remove(path);
        }
    }

    /// Index path of the selected node.
    pub fn selected(&self) -> Option<&[usize]> { self.selected.as_deref() }
}

fn toggle_handler(owner: ResourceHandle, path: HierarchyPath) -> ActionHandler {
    ActionHandler::new(move |ctx| {
        if let Some(state) = ctx.resource_mut::<HierarchyState>(owner) {
            state.pending_toggles.push(path.clone());
        }
    })
}

fn select_handler(owner: ResourceHandle, path: HierarchyPath) -> ActionHandler {
    ActionHandler::new(move |ctx| {
        if let Some(state) = ctx.resource_mut::<HierarchyState>(owner) {
            state.pending_select = Some(path.clone());
        }
    })
}

struct RowStyle {
    toggle: f32,
    gap: f32,
    element: Color,
    selection: Color,
    hover: Color,
    percentage: f32,
}

impl UIDrawer<'_> {
    /// Expandable tree of `roots`, one row per visible node starting on a fresh row. The toggle
    /// box expands or collapses a node; clicking a label selects it on the next draw.
    pub fn hierarchy(&mut self, name: &str, roots: &[HierarchyNode], config: &DrawConfig) -> HierarchyResponse {
        let handle = self.resource(name, config, |_| HierarchyState::default());
        let mut changed = false;
        let (expanded, selected) = {
            let state = self.expect_resource::<HierarchyState>(handle);
            for path in std::mem::take(&mut state.pending_toggles) {
                if !state.expanded.remove(&path) {
                    state.expanded.insert(path);
                }
            }
            if let Some(path) = state.pending_select.take() {
                if state.selected.as_ref() != Some(&path) {
                    log::trace!("hierarchy selection -> {:?}", path);
                    state.selected = Some(path);
                    changed = true;
                }
            }
            (state.expanded.clone(), state.selected.clone())
        };

        let style = self.style();
        let rows = RowStyle {
            toggle: style.default_element_scale.y,
            gap: style.element_indentation,
            element: style.color(ThemeColor::Element),
            selection: style.color(ThemeColor::Selection),
            hover: style.color(ThemeColor::ElementHover),
            percentage: style.hover_percentage,
        };
        let cursor = self.cursor();
        if cursor.current_x > cursor.row_start.x {
            self.next_row();
        }
        self.set_draw_mode(DrawMode::Indent, 0);
        self.push_identifier_stack(name);
        let mut path = Vec::new();
        self.hierarchy_rows(handle, roots, &mut path, &expanded, selected.as_deref(), &rows);
        self.pop_identifier_stack();
        self.set_draw_mode(cursor.draw_mode, cursor.draw_mode_target);
        HierarchyResponse { selected, changed }
    }

    #[allow(clippy::too_many_arguments)]
    fn hierarchy_rows(
        &mut self,
        owner: ResourceHandle,
        nodes: &[HierarchyNode],
        path: &mut HierarchyPath,
        expanded: &HashSet<HierarchyPath>,
        selected: Option<&[usize]>,
        rows: &RowStyle,
    ) {
        let depth = path.len();
        for (index, node) in nodes.iter().enumerate() {
            path.push(index);
            let open = expanded.contains(path.as_slice());
            self.push_identifier_index(index);
            self.indent(depth as f32 * rows.toggle);
            if node.children.is_empty() {
                self.indent(rows.toggle + rows.gap);
            } else {
                let toggle = DrawConfig::new()
                    .with(ScaleOption(vec2f(rows.toggle, rows.toggle)))
                    .with(Alignment::new(AlignX::Center, AlignY::Center))
                    .with(ColorOption(rows.element))
                    .with(HoverableOption { color: rows.hover, percentage: rows.percentage })
                    .with(CallbackOption(toggle_handler(owner, path.clone())));
                self.text_label("toggle", if open { "-" } else { "+" }, &toggle);
            }
            let mut label = DrawConfig::new()
                .with(Alignment::new(AlignX::Left, AlignY::Center))
                .with(HoverableOption { color: rows.hover, percentage: rows.percentage })
                .with(CallbackOption(select_handler(owner, path.clone())));
            if selected == Some(path.as_slice()) {
                label.add_flag(ColorOption(rows.selection));
            }
            self.text_label("label", &node.label, &label);
            self.next_row();
            if open {
                self.hierarchy_rows(owner, &node.children, path, expanded, selected, rows);
            }
            self.pop_identifier_stack();
            path.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::system;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn tree() -> Vec<HierarchyNode> {
        vec![HierarchyNode::branch("root", vec![HierarchyNode::branch("a", vec![HierarchyNode::leaf("x")]), HierarchyNode::leaf("b")])]
    }

    fn click(sys: &mut UiSystem, x: f32, y: f32) {
        sys.input().borrow_mut().mousedown(x, y, MouseButton::LEFT);
        sys.frame(0.016);
        sys.input().borrow_mut().mouseup(x, y, MouseButton::LEFT);
        sys.frame(0.016);
    }

    fn setup_with(roots: Vec<HierarchyNode>) -> (UiSystem, WindowHandle, Rc<RefCell<Vec<HierarchyResponse>>>) {
        let mut sys = system();
        let responses = Rc::new(RefCell::new(Vec::new()));
        let log = responses.clone();
        let w = sys.create_window(WindowDescriptor::new("w", UIBox::new(0.0, 0.0, 300.0, 300.0), move |d| {
            let response = d.hierarchy("tree", &roots, &DrawConfig::new());
            log.borrow_mut().push(response);
        }));
        (sys, w, responses)
    }

    fn setup() -> (UiSystem, WindowHandle, Rc<RefCell<Vec<HierarchyResponse>>>) { setup_with(tree()) }

    fn expanded(sys: &UiSystem, w: WindowHandle, path: &[usize]) -> bool {
        let Ok(window) = sys.window(w) else { return false };
        window.resources().find("tree").and_then(|h| window.resources().get::<HierarchyState>(h)).map(|s| s.is_expanded(path)).unwrap_or(false)
    }

    #[test]
    fn toggle_expands_and_label_selects() {
        let (mut sys, w, responses) = setup();
        click(&mut sys, 20.0, 20.0);
        assert!(expanded(&sys, w, &[0]));
        assert!(!expanded(&sys, w, &[0, 0]));

        click(&mut sys, 70.0, 80.0);
        sys.frame(0.016);
        let last = responses.borrow().last().cloned();
        assert_eq!(last.as_ref().and_then(|r| r.selected.clone()), Some(vec![0, 1]));
        assert_eq!(responses.borrow().iter().filter(|r| r.changed).count(), 1);
        assert!(!last.map(|r| r.changed).unwrap_or(true));
    }

    #[test]
    fn collapsed_children_are_not_drawn() {
        let (mut sys, w, responses) = setup();
        sys.frame(0.016);
        let collapsed = sys.window(w).map(|win| win.resources().len()).unwrap_or(0);
        click(&mut sys, 20.0, 20.0);
        let expanded_count = sys.window(w).map(|win| win.resources().len()).unwrap_or(0);
        assert!(expanded_count > collapsed);
        assert!(responses.borrow().iter().all(|r| r.selected.is_none()));
    }

    #[test]
    fn siblings_with_the_same_label_keep_their_own_state() {
        let roots = vec![HierarchyNode::branch("Cube", vec![HierarchyNode::leaf("Mesh")]), HierarchyNode::leaf("Cube")];
        let (mut sys, w, responses) = setup_with(roots.clone());
        sys.frame(0.016);
        click(&mut sys, 20.0, 20.0);
        assert!(expanded(&sys, w, &[0]));
        assert!(!expanded(&sys, w, &[1]));

        click(&mut sys, 70.0, 80.0);
        sys.frame(0.016);
        let selected = responses.borrow().last().and_then(|r| r.selected.clone());
        assert_eq!(selected, Some(vec![1]));
        assert_eq!(selected.and_then(|p| HierarchyNode::at(&roots, &p).map(|n| n.label.clone())).as_deref(), Some("Cube"));
        assert_eq!(HierarchyNode::at(&roots, &[0, 0]).map(|n| n.label.as_str()), Some("Mesh"));
        assert!(HierarchyNode::at(&roots, &[0, 1]).is_none());
    }
}
