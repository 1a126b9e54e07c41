//! Context-menu options offered on a drive node

use std::fmt;
use std::str::FromStr;

/// Option selectable from a node's context menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeOption {
    Delete,
    Rename,
    Duplicate,
    /// Open the node's document on the remote drive's switchboard
    SwitchboardLink,
}

impl NodeOption {
    /// Options every node offers, in menu order
    pub const DEFAULTS: [NodeOption; 3] = [NodeOption::Delete, NodeOption::Rename, NodeOption::Duplicate];

    /// Wire identifier of the option
    pub fn id(&self) -> &'static str {
        match self {
            NodeOption::Delete => "delete",
            NodeOption::Rename => "rename",
            NodeOption::Duplicate => "duplicate",
            NodeOption::SwitchboardLink => "switchboard-link",
        }
    }

    /// Fluent message id of the menu label
    pub fn label_key(&self) -> &'static str {
        match self {
            NodeOption::Delete => "files-options-delete",
            NodeOption::Rename => "files-options-rename",
            NodeOption::Duplicate => "files-options-duplicate",
            NodeOption::SwitchboardLink => "files-options-switchboard-link",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            NodeOption::Delete => "trash",
            NodeOption::Rename => "pencil",
            NodeOption::Duplicate => "files-earmark",
            NodeOption::SwitchboardLink => "drive",
        }
    }

    /// Parse a wire identifier, `None` for identifiers outside the closed set
    pub fn parse(id: &str) -> Option<Self> {
        id.parse().ok()
    }

    /// Options offered for a node, remote drives get the switchboard link first
    pub fn for_drive(is_remote: bool) -> Vec<NodeOption> {
        let mut options = Vec::with_capacity(4);
        if is_remote {
            options.push(NodeOption::SwitchboardLink);
        }
        options.extend(Self::DEFAULTS);
        options
    }
}

impl fmt::Display for NodeOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Identifier outside the set of node options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOption(pub String);

impl fmt::Display for UnknownOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown node option: {}", self.0)
    }
}

impl FromStr for NodeOption {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "delete" => Ok(NodeOption::Delete),
            "rename" => Ok(NodeOption::Rename),
            "duplicate" => Ok(NodeOption::Duplicate),
            "switchboard-link" => Ok(NodeOption::SwitchboardLink),
            other => Err(UnknownOption(other.to_string())),
        }
    }
}
