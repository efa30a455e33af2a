use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Role a node plays in the tree; parent/child rules are written against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeCategory {
    View,
    Representation,
    Widget,
    DataSource,
    FieldContainer,
    Field,
}

impl NodeCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            NodeCategory::View => "View",
            NodeCategory::Representation => "Representation",
            NodeCategory::Widget => "Widget",
            NodeCategory::DataSource => "DataSource",
            NodeCategory::FieldContainer => "FieldContainer",
            NodeCategory::Field => "Field",
        }
    }
}

impl fmt::Display for NodeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown component type `{0}`")]
pub struct UnknownTag(pub String);

/// Generates the NodeType enum with its tag/category tables.
macro_rules! define_node_types {
    ( $( $variant:ident => $category:ident ),+ $(,)? ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum NodeType { $( $variant, )+ }

        impl NodeType {
            pub const ALL: &'static [NodeType] = &[ $( NodeType::$variant, )+ ];

            pub const fn as_str(self) -> &'static str {
                match self {
                    $( NodeType::$variant => stringify!($variant), )+
                }
            }

            pub const fn category(self) -> NodeCategory {
                match self {
                    $( NodeType::$variant => NodeCategory::$category, )+
                }
            }

            pub fn from_tag(tag: &str) -> Option<Self> {
                match tag {
                    $( stringify!($variant) => Some(NodeType::$variant), )+
                    _ => None,
                }
            }
        }
    };
}

define_node_types! {
    View => View,
    GeometryRepresentation => Representation,
    VolumeRepresentation => Representation,
    SliceRepresentation => Representation,
    GlyphRepresentation => Representation,
    VolumeController => Widget,
    Algorithm => DataSource,
    Reader => DataSource,
    ImageData => DataSource,
    PolyData => DataSource,
    ShareDataSet => DataSource,
    PointData => FieldContainer,
    CellData => FieldContainer,
    FieldData => FieldContainer,
    DataArray => Field,
}

impl NodeType {
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Data sets with explicit geometry, so point and cell counts are known.
    #[inline]
    pub const fn is_data_set(self) -> bool {
        matches!(self, NodeType::ImageData | NodeType::PolyData)
    }

    #[inline]
    pub const fn is_representation(self) -> bool {
        matches!(self.category(), NodeCategory::Representation)
    }

    pub fn allows_child(self, child: NodeType) -> bool {
        use NodeCategory as C;
        let cat = child.category();
        match self {
            NodeType::View => child.is_representation(),
            NodeType::GeometryRepresentation
            | NodeType::SliceRepresentation
            | NodeType::GlyphRepresentation
            | NodeType::Algorithm
            | NodeType::ShareDataSet => cat == C::DataSource,
            NodeType::VolumeRepresentation => {
                cat == C::DataSource || child == NodeType::VolumeController
            }
            NodeType::ImageData | NodeType::PolyData => cat == C::FieldContainer,
            NodeType::PointData | NodeType::CellData | NodeType::FieldData => {
                child == NodeType::DataArray
            }
            NodeType::Reader | NodeType::VolumeController | NodeType::DataArray => false,
        }
    }

    /// Upper bound on the number of children, when there is one.
    pub const fn max_children(self) -> Option<usize> {
        match self {
            NodeType::ShareDataSet => Some(1),
            NodeType::Reader | NodeType::VolumeController | NodeType::DataArray => Some(0),
            _ => None,
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeType::from_tag(s).ok_or_else(|| UnknownTag(s.to_string()))
    }
}

/// Convenience components that expand into a subtree of primitive nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HelperType {
    Mesh,
    Volume,
    PointCloudRepresentation,
    VolumeDataRepresentation,
}

impl HelperType {
    pub const ALL: &'static [HelperType] = &[
        HelperType::Mesh,
        HelperType::Volume,
        HelperType::PointCloudRepresentation,
        HelperType::VolumeDataRepresentation,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            HelperType::Mesh => "Mesh",
            HelperType::Volume => "Volume",
            HelperType::PointCloudRepresentation => "PointCloudRepresentation",
            HelperType::VolumeDataRepresentation => "VolumeDataRepresentation",
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        HelperType::ALL.iter().copied().find(|h| h.as_str() == tag)
    }

    /// Node type at the root of the expanded subtree.
    pub const fn expands_to(self) -> NodeType {
        match self {
            HelperType::Mesh => NodeType::PolyData,
            HelperType::Volume => NodeType::ImageData,
            HelperType::PointCloudRepresentation => NodeType::GeometryRepresentation,
            HelperType::VolumeDataRepresentation => NodeType::VolumeRepresentation,
        }
    }
}

impl fmt::Display for HelperType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any tag a scene description may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentTag {
    Node(NodeType),
    Helper(HelperType),
}

impl ComponentTag {
    pub const fn as_str(self) -> &'static str {
        match self {
            ComponentTag::Node(ty) => ty.as_str(),
            ComponentTag::Helper(ty) => ty.as_str(),
        }
    }
}

impl fmt::Display for ComponentTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentTag {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(ty) = NodeType::from_tag(s) {
            return Ok(ComponentTag::Node(ty));
        }
        HelperType::from_tag(s)
            .map(ComponentTag::Helper)
            .ok_or_else(|| UnknownTag(s.to_string()))
    }
}

impl From<NodeType> for ComponentTag {
    fn from(ty: NodeType) -> Self {
        ComponentTag::Node(ty)
    }
}

impl From<HelperType> for ComponentTag {
    fn from(ty: HelperType) -> Self {
        ComponentTag::Helper(ty)
    }
}
