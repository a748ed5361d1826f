//! Cardinality marker catalogue.
//!
//! # Responsibility
//! - Enumerate every marker kind an edge end can carry.
//! - Hold the static glyph definition for each kind.
//! - Render the catalogue as SVG `<defs>` for export collaborators.
//!
//! # Invariants
//! - The catalogue is immutable and holds exactly one glyph per drawable kind.
//! - `MarkerKind::None` never has a glyph.
//! - Serialized kind names match the persisted edge `"type"` values.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Marker width/height applied whenever the editor sets a marker.
pub const DEFAULT_MARKER_SIZE: f64 = 30.0;

const STROKE_GREY: &str = "#6a6a6a";
const ARROW_GREY: &str = "#b1b1b7";

/// Marker symbol drawn at one end of an edge.
///
/// Crow's-foot style kinds come in start/end variants because the glyphs are
/// mirrored rather than rotated by 180 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerKind {
    #[serde(rename = "none")]
    None,
    #[serde(rename = "arrow")]
    Arrow,
    #[serde(rename = "arrowclosed")]
    ArrowClosed,
    ManyStart,
    ManyEnd,
    ZeroManyStart,
    ZeroManyEnd,
    OneManyStart,
    OneManyEnd,
    OnlyOneStart,
    OnlyOneEnd,
    OneStart,
    OneEnd,
    ZeroOneStart,
    ZeroOneEnd,
}

impl MarkerKind {
    /// Every kind, in menu order.
    pub const ALL: [MarkerKind; 15] = [
        MarkerKind::None,
        MarkerKind::Arrow,
        MarkerKind::ArrowClosed,
        MarkerKind::ZeroOneStart,
        MarkerKind::ZeroOneEnd,
        MarkerKind::OneStart,
        MarkerKind::OneEnd,
        MarkerKind::OnlyOneStart,
        MarkerKind::OnlyOneEnd,
        MarkerKind::ZeroManyStart,
        MarkerKind::ZeroManyEnd,
        MarkerKind::OneManyStart,
        MarkerKind::OneManyEnd,
        MarkerKind::ManyStart,
        MarkerKind::ManyEnd,
    ];

    /// Persisted `"type"` string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Arrow => "arrow",
            Self::ArrowClosed => "arrowclosed",
            Self::ManyStart => "ManyStart",
            Self::ManyEnd => "ManyEnd",
            Self::ZeroManyStart => "ZeroManyStart",
            Self::ZeroManyEnd => "ZeroManyEnd",
            Self::OneManyStart => "OneManyStart",
            Self::OneManyEnd => "OneManyEnd",
            Self::OnlyOneStart => "OnlyOneStart",
            Self::OnlyOneEnd => "OnlyOneEnd",
            Self::OneStart => "OneStart",
            Self::OneEnd => "OneEnd",
            Self::ZeroOneStart => "ZeroOneStart",
            Self::ZeroOneEnd => "ZeroOneEnd",
        }
    }

    pub fn has_glyph(self) -> bool {
        self != Self::None
    }

    /// Cardinality expressed by this kind, if it is a crow's-foot symbol.
    pub fn cardinality(self) -> Option<Cardinality> {
        match self {
            Self::None | Self::Arrow | Self::ArrowClosed => None,
            Self::OneStart | Self::OneEnd => Some(Cardinality::One),
            Self::OnlyOneStart | Self::OnlyOneEnd => Some(Cardinality::OnlyOne),
            Self::ZeroOneStart | Self::ZeroOneEnd => Some(Cardinality::ZeroOrOne),
            Self::ManyStart | Self::ManyEnd => Some(Cardinality::Many),
            Self::ZeroManyStart | Self::ZeroManyEnd => Some(Cardinality::ZeroOrMany),
            Self::OneManyStart | Self::OneManyEnd => Some(Cardinality::OneOrMany),
        }
    }
}

/// Direction-free cardinality symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    One,
    OnlyOne,
    ZeroOrOne,
    Many,
    ZeroOrMany,
    OneOrMany,
}

impl Cardinality {
    /// Variant drawn at the source end of an edge.
    pub fn start_marker(self) -> MarkerKind {
        match self {
            Self::One => MarkerKind::OneStart,
            Self::OnlyOne => MarkerKind::OnlyOneStart,
            Self::ZeroOrOne => MarkerKind::ZeroOneStart,
            Self::Many => MarkerKind::ManyStart,
            Self::ZeroOrMany => MarkerKind::ZeroManyStart,
            Self::OneOrMany => MarkerKind::OneManyStart,
        }
    }

    /// Variant drawn at the target end of an edge.
    pub fn end_marker(self) -> MarkerKind {
        match self {
            Self::One => MarkerKind::OneEnd,
            Self::OnlyOne => MarkerKind::OnlyOneEnd,
            Self::ZeroOrOne => MarkerKind::ZeroOneEnd,
            Self::Many => MarkerKind::ManyEnd,
            Self::ZeroOrMany => MarkerKind::ZeroManyEnd,
            Self::OneOrMany => MarkerKind::OneManyEnd,
        }
    }
}

/// Persisted marker `"type"`: a catalogue kind, or a shell-defined name kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MarkerType {
    Known(MarkerKind),
    Custom(String),
}

impl MarkerType {
    pub fn known(&self) -> Option<MarkerKind> {
        match self {
            Self::Known(kind) => Some(*kind),
            Self::Custom(_) => None,
        }
    }
}

impl From<MarkerKind> for MarkerType {
    fn from(value: MarkerKind) -> Self {
        Self::Known(value)
    }
}

/// Marker reference persisted on an edge end.
///
/// Fields the shell adds (`color`, `strokeWidth`, `orient`, ...) are kept in
/// `extra` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeMarker {
    #[serde(rename = "type")]
    pub marker_type: MarkerType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EdgeMarker {
    pub fn new(kind: MarkerKind) -> Self {
        Self {
            marker_type: MarkerType::Known(kind),
            width: Some(DEFAULT_MARKER_SIZE),
            height: Some(DEFAULT_MARKER_SIZE),
            extra: Map::new(),
        }
    }

    /// Catalogue kind, or `None` for a shell-defined marker.
    pub fn kind(&self) -> Option<MarkerKind> {
        self.marker_type.known()
    }
}

/// Paint applied to one glyph primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphStyle {
    pub fill: &'static str,
    pub stroke: &'static str,
    pub stroke_width: &'static str,
}

/// Vector primitive inside a marker glyph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GlyphElement {
    Path {
        d: &'static str,
        transform: Option<&'static str>,
        style: GlyphStyle,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
        transform: &'static str,
        style: GlyphStyle,
    },
    Polyline {
        points: &'static str,
        style: GlyphStyle,
    },
}

/// Static glyph definition for one marker kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerGlyph {
    pub kind: MarkerKind,
    pub view_box: &'static str,
    /// Reference point pinned to the connector endpoint.
    pub ref_x: f64,
    pub ref_y: f64,
    pub marker_width: f64,
    pub marker_height: f64,
    pub elements: &'static [GlyphElement],
}

const CROW_LINE: GlyphStyle = GlyphStyle {
    fill: "#fff",
    stroke: STROKE_GREY,
    stroke_width: ".8px",
};
const SHAFT_LINE: GlyphStyle = GlyphStyle {
    fill: "none",
    stroke: STROKE_GREY,
    stroke_width: ".8px",
};
const ZERO_RING: GlyphStyle = GlyphStyle {
    fill: "#141414",
    stroke: STROKE_GREY,
    stroke_width: "1.07px",
};
const BAR_THIN: GlyphStyle = GlyphStyle {
    fill: "none",
    stroke: STROKE_GREY,
    stroke_width: ".61px",
};
const BAR_DOUBLE: GlyphStyle = GlyphStyle {
    fill: "none",
    stroke: STROKE_GREY,
    stroke_width: ".7px",
};
const BAR_SINGLE: GlyphStyle = GlyphStyle {
    fill: "none",
    stroke: STROKE_GREY,
    stroke_width: ".81px",
};
const MANY_CROW: GlyphStyle = GlyphStyle {
    fill: "white",
    stroke: "rgb(106,106,106)",
    stroke_width: "0.65px",
};
const MANY_SHAFT: GlyphStyle = GlyphStyle {
    fill: "none",
    stroke: "rgb(106,106,106)",
    stroke_width: "0.65px",
};
const ARROW_OPEN: GlyphStyle = GlyphStyle {
    fill: "none",
    stroke: ARROW_GREY,
    stroke_width: "1",
};
const ARROW_FILLED: GlyphStyle = GlyphStyle {
    fill: ARROW_GREY,
    stroke: ARROW_GREY,
    stroke_width: "1",
};

const CROW_D: &str = "m12.997 12.725 20.377-9.904m-20.377 9.904 20.377 9.871";
const SHAFT_D: &str = "M12.997 12.725h20.377";
const BAR_D: &str = "M238.226 287.912v9.332";
const MANY_CROW_D: &str = "M12.997,12.725L33.374,2.821M12.997,12.725L33.374,22.596";
const MANY_SHAFT_D: &str = "M12.997,12.725L33.374,12.725";
const RING_CX: f64 = 233.062;
const RING_CY: f64 = 295.933;
const RING_R: f64 = 5.82;

static MARKER_GLYPHS: &[MarkerGlyph] = &[
    MarkerGlyph {
        kind: MarkerKind::Arrow,
        view_box: "-10 -10 20 20",
        ref_x: 0.0,
        ref_y: 0.0,
        marker_width: DEFAULT_MARKER_SIZE,
        marker_height: DEFAULT_MARKER_SIZE,
        elements: &[GlyphElement::Polyline {
            points: "-5,-4 0,0 -5,4",
            style: ARROW_OPEN,
        }],
    },
    MarkerGlyph {
        kind: MarkerKind::ArrowClosed,
        view_box: "-10 -10 20 20",
        ref_x: 0.0,
        ref_y: 0.0,
        marker_width: DEFAULT_MARKER_SIZE,
        marker_height: DEFAULT_MARKER_SIZE,
        elements: &[GlyphElement::Polyline {
            points: "-5,-4 0,0 -5,4 -5,-4",
            style: ARROW_FILLED,
        }],
    },
    MarkerGlyph {
        kind: MarkerKind::ManyStart,
        view_box: "0 0 40 40",
        ref_x: 12.0,
        ref_y: 11.4,
        marker_width: 60.0,
        marker_height: 60.0,
        elements: &[
            GlyphElement::Path {
                d: MANY_CROW_D,
                transform: Some("matrix(1,0,0,1,-291.263,-233.619) matrix(-1,0,0,1,325.977,232.138)"),
                style: MANY_CROW,
            },
            GlyphElement::Path {
                d: MANY_SHAFT_D,
                transform: Some("matrix(1,0,0,1,-291.263,-233.619) matrix(-1,0,0,1,325.977,232.138)"),
                style: MANY_SHAFT,
            },
        ],
    },
    MarkerGlyph {
        kind: MarkerKind::ManyEnd,
        view_box: "0 0 40 40",
        ref_x: 12.0,
        ref_y: 11.4,
        marker_width: 60.0,
        marker_height: 60.0,
        elements: &[
            GlyphElement::Path {
                d: MANY_CROW_D,
                transform: Some("matrix(1,0,0,1,-218.097,-228.667) matrix(1,0,0,1,206.44,227.186)"),
                style: MANY_CROW,
            },
            GlyphElement::Path {
                d: MANY_SHAFT_D,
                transform: Some("matrix(1,0,0,1,-218.097,-228.667) matrix(1,0,0,1,206.44,227.186)"),
                style: MANY_SHAFT,
            },
        ],
    },
    MarkerGlyph {
        kind: MarkerKind::ZeroManyStart,
        view_box: "0 0 32 22",
        ref_x: 8.0,
        ref_y: 11.5,
        marker_width: 25.0,
        marker_height: 17.0,
        elements: &[
            GlyphElement::Path {
                d: CROW_D,
                transform: Some("matrix(-1 0 0 1 35.023 -1.172)"),
                style: CROW_LINE,
            },
            GlyphElement::Circle {
                cx: RING_CX,
                cy: RING_CY,
                r: RING_R,
                transform: "matrix(-.74877 0 0 .74877 200.892 -210.048)",
                style: ZERO_RING,
            },
            GlyphElement::Path {
                d: SHAFT_D,
                transform: Some("matrix(-1 0 0 1 35.023 -1.172)"),
                style: SHAFT_LINE,
            },
        ],
    },
    MarkerGlyph {
        kind: MarkerKind::ZeroManyEnd,
        view_box: "0 0 30 22",
        ref_x: 24.0,
        ref_y: 11.5,
        marker_width: 25.0,
        marker_height: 17.0,
        elements: &[
            GlyphElement::Path {
                d: CROW_D,
                transform: Some("translate(-3.881 -1.172)"),
                style: CROW_LINE,
            },
            GlyphElement::Circle {
                cx: RING_CX,
                cy: RING_CY,
                r: RING_R,
                transform: "matrix(.74877 0 0 .74877 -169.75 -210.048)",
                style: ZERO_RING,
            },
            GlyphElement::Path {
                d: SHAFT_D,
                transform: Some("translate(-3.881 -1.172)"),
                style: SHAFT_LINE,
            },
        ],
    },
    MarkerGlyph {
        kind: MarkerKind::OneManyStart,
        view_box: "0 0 32 22",
        ref_x: 4.0,
        ref_y: 11.5,
        marker_width: 25.0,
        marker_height: 17.0,
        elements: &[
            GlyphElement::Path {
                d: CROW_D,
                transform: Some("matrix(-1 0 0 1 35.023 -1.173)"),
                style: CROW_LINE,
            },
            GlyphElement::Path {
                d: SHAFT_D,
                transform: Some("matrix(-1 0 0 1 35.023 -1.173)"),
                style: SHAFT_LINE,
            },
            GlyphElement::Path {
                d: BAR_D,
                transform: Some("matrix(-1 0 0 1.27075 260.704 -360.257)"),
                style: BAR_THIN,
            },
        ],
    },
    MarkerGlyph {
        kind: MarkerKind::OneManyEnd,
        view_box: "0 0 32 22",
        ref_x: 19.0,
        ref_y: 11.5,
        marker_width: 25.0,
        marker_height: 17.0,
        elements: &[
            GlyphElement::Path {
                d: CROW_D,
                transform: Some("translate(-11.348 -1.173)"),
                style: CROW_LINE,
            },
            GlyphElement::Path {
                d: SHAFT_D,
                transform: Some("translate(-11.348 -1.173)"),
                style: SHAFT_LINE,
            },
            GlyphElement::Path {
                d: BAR_D,
                transform: Some("matrix(1 0 0 1.27075 -237.029 -360.257)"),
                style: BAR_THIN,
            },
        ],
    },
    MarkerGlyph {
        kind: MarkerKind::OnlyOneStart,
        view_box: "0 0 32 22",
        ref_x: -10.0,
        ref_y: 11.5,
        marker_width: 25.0,
        marker_height: 17.0,
        elements: &[
            GlyphElement::Path {
                d: BAR_D,
                transform: Some("matrix(1.06523 0 0 2.39898 -253.115 -690.044)"),
                style: BAR_DOUBLE,
            },
            GlyphElement::Path {
                d: BAR_D,
                transform: Some("matrix(1.06523 0 0 2.39898 -248.651 -690.044)"),
                style: BAR_DOUBLE,
            },
        ],
    },
    MarkerGlyph {
        kind: MarkerKind::OnlyOneEnd,
        view_box: "0 0 32 22",
        ref_x: 16.0,
        ref_y: 11.5,
        marker_width: 25.0,
        marker_height: 17.0,
        elements: &[
            GlyphElement::Path {
                d: BAR_D,
                transform: Some("matrix(1.06523 0 0 2.39898 -253.115 -690.044)"),
                style: BAR_DOUBLE,
            },
            GlyphElement::Path {
                d: BAR_D,
                transform: Some("matrix(1.06523 0 0 2.39898 -248.651 -690.044)"),
                style: BAR_DOUBLE,
            },
        ],
    },
    MarkerGlyph {
        kind: MarkerKind::OneStart,
        view_box: "0 0 32 22",
        ref_x: -13.0,
        ref_y: 11.5,
        marker_width: 25.0,
        marker_height: 17.0,
        elements: &[GlyphElement::Path {
            d: BAR_D,
            transform: Some("matrix(1.06523 0 0 2.01957 -253.115 -580.807)"),
            style: BAR_SINGLE,
        }],
    },
    MarkerGlyph {
        kind: MarkerKind::OneEnd,
        view_box: "0 0 32 22",
        ref_x: 13.0,
        ref_y: 11.5,
        marker_width: 25.0,
        marker_height: 17.0,
        elements: &[GlyphElement::Path {
            d: BAR_D,
            transform: Some("matrix(1.06523 0 0 2.01957 -253.115 -580.807)"),
            style: BAR_SINGLE,
        }],
    },
    MarkerGlyph {
        kind: MarkerKind::ZeroOneStart,
        view_box: "0 0 32 22",
        ref_x: -9.0,
        ref_y: 10.0,
        marker_width: 25.0,
        marker_height: 17.0,
        elements: &[
            GlyphElement::Path {
                d: BAR_D,
                transform: Some("matrix(1.06523 0 0 2.01957 -253.115 -580.807)"),
                style: BAR_SINGLE,
            },
            GlyphElement::Circle {
                cx: RING_CX,
                cy: RING_CY,
                r: RING_R,
                transform: "matrix(-.74877 0 0 .74877 185.347 -211.511)",
                style: ZERO_RING,
            },
        ],
    },
    MarkerGlyph {
        kind: MarkerKind::ZeroOneEnd,
        view_box: "0 0 32 22",
        ref_x: 25.0,
        ref_y: 10.0,
        marker_width: 25.0,
        marker_height: 17.0,
        elements: &[
            GlyphElement::Path {
                d: BAR_D,
                transform: Some("matrix(-1.06523 0 0 2.01957 268.711 -580.807)"),
                style: BAR_SINGLE,
            },
            GlyphElement::Circle {
                cx: RING_CX,
                cy: RING_CY,
                r: RING_R,
                transform: "matrix(.74877 0 0 .74877 -169.751 -211.511)",
                style: ZERO_RING,
            },
        ],
    },
];

/// Looks up the glyph for `kind`; `None` for `MarkerKind::None`.
pub fn marker_glyph(kind: MarkerKind) -> Option<&'static MarkerGlyph> {
    MARKER_GLYPHS.iter().find(|glyph| glyph.kind == kind)
}

/// Element id the shell references from `marker-start`/`marker-end`.
pub fn marker_element_id(kind: MarkerKind) -> String {
    format!(
        "1__height={size}&type={kind}&width={size}",
        size = DEFAULT_MARKER_SIZE,
        kind = kind.as_str()
    )
}

/// Renders every glyph of the catalogue as one SVG `<defs>` block.
pub fn render_marker_defs() -> String {
    let mut out = String::from("<defs>");
    for glyph in MARKER_GLYPHS {
        out.push_str(&format!(
            r#"<marker id="{}" viewBox="{}" refX="{}" refY="{}" markerWidth="{}" markerHeight="{}" orient="auto">"#,
            escape_attr(&marker_element_id(glyph.kind)),
            glyph.view_box,
            glyph.ref_x,
            glyph.ref_y,
            glyph.marker_width,
            glyph.marker_height,
        ));
        for element in glyph.elements {
            render_element(&mut out, element);
        }
        out.push_str("</marker>");
    }
    out.push_str("</defs>");
    out
}

fn render_element(out: &mut String, element: &GlyphElement) {
    match element {
        GlyphElement::Path {
            d,
            transform,
            style,
        } => {
            out.push_str(&format!(r#"<path d="{d}""#));
            if let Some(transform) = transform {
                out.push_str(&format!(r#" transform="{transform}""#));
            }
            push_style(out, style);
            out.push_str("/>");
        }
        GlyphElement::Circle {
            cx,
            cy,
            r,
            transform,
            style,
        } => {
            out.push_str(&format!(
                r#"<circle cx="{cx}" cy="{cy}" r="{r}" transform="{transform}""#
            ));
            push_style(out, style);
            out.push_str("/>");
        }
        GlyphElement::Polyline { points, style } => {
            out.push_str(&format!(
                r#"<polyline points="{points}" stroke-linecap="round" stroke-linejoin="round""#
            ));
            push_style(out, style);
            out.push_str("/>");
        }
    }
}

fn push_style(out: &mut String, style: &GlyphStyle) {
    out.push_str(&format!(
        r#" fill="{}" stroke="{}" stroke-width="{}""#,
        style.fill, style.stroke, style.stroke_width
    ));
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}

#[cfg(test)]
mod tests {
    use super::{
        marker_element_id, marker_glyph, render_marker_defs, Cardinality, EdgeMarker, MarkerKind,
        MarkerType,
    };

    #[test]
    fn every_drawable_kind_has_exactly_one_glyph() {
        for kind in MarkerKind::ALL {
            let glyph = marker_glyph(kind);
            assert_eq!(glyph.is_some(), kind.has_glyph(), "{kind:?}");
            if let Some(glyph) = glyph {
                assert!(!glyph.elements.is_empty());
            }
        }
    }

    #[test]
    fn cardinality_maps_to_directional_variants() {
        let all = [
            Cardinality::One,
            Cardinality::OnlyOne,
            Cardinality::ZeroOrOne,
            Cardinality::Many,
            Cardinality::ZeroOrMany,
            Cardinality::OneOrMany,
        ];
        for cardinality in all {
            assert_eq!(cardinality.start_marker().cardinality(), Some(cardinality));
            assert_eq!(cardinality.end_marker().cardinality(), Some(cardinality));
            assert_ne!(cardinality.start_marker(), cardinality.end_marker());
        }
    }

    #[test]
    fn marker_wire_names_match_persisted_values() {
        let marker = EdgeMarker::new(MarkerKind::ArrowClosed);
        let json = serde_json::to_value(&marker).unwrap();
        assert_eq!(json["type"], "arrowclosed");
        assert_eq!(json["width"], 30.0);

        let decoded: EdgeMarker =
            serde_json::from_str(r#"{"type":"ZeroOneEnd","width":30,"height":30}"#).unwrap();
        assert_eq!(decoded.kind(), Some(MarkerKind::ZeroOneEnd));
        for kind in MarkerKind::ALL {
            let value = serde_json::to_value(kind).unwrap();
            assert_eq!(value, kind.as_str());
        }
    }

    #[test]
    fn defs_reference_escaped_marker_ids() {
        assert_eq!(
            marker_element_id(MarkerKind::ManyStart),
            "1__height=30&type=ManyStart&width=30"
        );
        let defs = render_marker_defs();
        assert!(defs.starts_with("<defs>"));
        assert!(defs.contains(r#"id="1__height=30&amp;type=OneEnd&amp;width=30""#));
        assert_eq!(defs.matches("<marker ").count(), 14);
    }

    #[test]
    fn shell_marker_fields_survive_round_trip() {
        let raw = serde_json::json!({
            "type": "arrowclosed",
            "width": 20.0,
            "height": 20.0,
            "color": "#f00",
            "strokeWidth": 2
        });
        let marker: EdgeMarker = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(marker.kind(), Some(MarkerKind::ArrowClosed));
        assert_eq!(marker.extra["color"], "#f00");
        assert_eq!(serde_json::to_value(&marker).unwrap(), raw);
    }

    #[test]
    fn unknown_marker_type_is_kept_verbatim() {
        let raw = serde_json::json!({"type": "crow-foot-custom", "color": "#333"});
        let marker: EdgeMarker = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(
            marker.marker_type,
            MarkerType::Custom("crow-foot-custom".to_string())
        );
        assert_eq!(marker.kind(), None);
        assert_eq!(marker.width, None);
        assert_eq!(serde_json::to_value(&marker).unwrap(), raw);
    }
}
