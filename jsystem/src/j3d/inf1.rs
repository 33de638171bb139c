use common::vfile::VFile;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use crate::{binaries::ByteCursor, error::Result};

#[derive(Copy, Clone, FromPrimitive, Debug, PartialEq, Eq)]
#[repr(u16)]
pub enum NodeType {
    Finish = 0x00,
    NewNode = 0x01,
    EndNode = 0x02,
    Joint = 0x10,
    Material = 0x11,
    Shape = 0x12,
}

/// One record of the flat hierarchy command list.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HierarchyNode {
    pub kind: NodeType,
    pub index: u16,
}

/// A joint, material or shape reference with the nodes nested beneath it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SceneNode {
    pub kind: NodeType,
    pub index: u16,
    pub children: Vec<SceneNode>,
}

#[derive(Clone, Debug, Default)]
pub struct Inf1 {
    pub flags: u16,
    pub packet_count: u32,
    pub vertex_count: u32,
    pub hierarchy_offset: u32,
    /// Records up to, not including, the terminating `Finish`.
    pub nodes: Vec<HierarchyNode>,
}

impl Inf1 {
    pub fn parse(raw: &VFile) -> Result<Self> {
        let data = raw.data();
        let mut c = ByteCursor::at(data, 8);
        let flags = c.read_u16()?;
        c.skip(2);
        let packet_count = c.read_u32()?;
        let vertex_count = c.read_u32()?;
        let hierarchy_offset = c.read_u32()?;

        // the record count is never stored, the list is padded out to the chunk end
        let max_records = raw.len().saturating_sub(hierarchy_offset as usize) / 4;
        let mut nodes = Vec::new();
        let mut c = ByteCursor::at(data, hierarchy_offset as usize);
        for _ in 0..max_records {
            let raw_kind = c.read_u16()?;
            let index = c.read_u16()?;
            match NodeType::from_u16(raw_kind) {
                Some(NodeType::Finish) => break,
                Some(kind) => nodes.push(HierarchyNode { kind, index }),
                None => {
                    log::warn!(
                        "Unknown hierarchy node type {:#06x} at {:#x}, ending walk",
                        raw_kind,
                        c.position() - 4
                    );
                    break;
                }
            }
        }

        Ok(Self {
            flags,
            packet_count,
            vertex_count,
            hierarchy_offset,
            nodes,
        })
    }

    /// Fold the flat record list into a tree. `NewNode` opens the children of the node
    /// before it, `EndNode` closes them.
    pub fn scene_graph(&self) -> Vec<SceneNode> {
        let mut levels: Vec<Vec<SceneNode>> = vec![Vec::new()];

        fn close(levels: &mut Vec<Vec<SceneNode>>) {
            if levels.len() < 2 {
                return;
            }
            let children = levels.pop().unwrap_or_default();
            if let Some(level) = levels.last_mut() {
                match level.last_mut() {
                    Some(parent) => parent.children.extend(children),
                    None => level.extend(children),
                }
            }
        }

        for node in &self.nodes {
            match node.kind {
                NodeType::NewNode => levels.push(Vec::new()),
                NodeType::EndNode => close(&mut levels),
                NodeType::Finish => break,
                kind => {
                    if let Some(level) = levels.last_mut() {
                        level.push(SceneNode {
                            kind,
                            index: node.index,
                            children: Vec::new(),
                        });
                    }
                }
            }
        }
        while levels.len() > 1 {
            close(&mut levels);
        }
        levels.pop().unwrap_or_default()
    }
}
