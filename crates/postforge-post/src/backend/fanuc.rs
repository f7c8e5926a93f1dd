//! FANUC TP backend, ASCII (LS) form.
//!
//! The `/MN` section references positions as `P[n]`; the positions themselves
//! are collected while walking and written to the `/POS` section by the
//! footer. Every `/MN` line carries a line number, so the backend keeps a
//! counter and numbers hook text too.

use postforge_toolpath::ToolpathSummary;

use super::{format_coord, sanitize_identifier, summary_lines, VendorBackend};
use crate::config::{FanucSettings, GeneratorConfig};
use crate::context::PointContext;
use crate::dialect::Dialect;

const MAX_NAME_LEN: usize = 36;

#[derive(Debug, Clone, PartialEq)]
struct PositionRecord {
    position: [f64; 3],
    w: f64,
    p: f64,
    r: f64,
}

/// Emits numbered `L` / `J` instructions plus a `/POS` table.
#[derive(Debug, Clone)]
pub struct FanucBackend {
    program_name: String,
    settings: FanucSettings,
    line_number: usize,
    positions: Vec<PositionRecord>,
}

impl FanucBackend {
    /// Create from a configuration.
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            program_name: sanitize_identifier(&config.program_name, MAX_NAME_LEN, true),
            settings: config.fanuc.clone(),
            line_number: 0,
            positions: Vec::new(),
        }
    }

    /// Number of positions registered so far.
    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    fn numbered(&mut self, body: &str) -> String {
        self.line_number += 1;
        format!("{:>4}:  {} ;", self.line_number, body)
    }

    fn register(&mut self, ctx: &PointContext) -> usize {
        let o = &ctx.orientation;
        self.positions.push(PositionRecord {
            position: ctx.position,
            w: o.roll_deg(),
            p: o.pitch_deg(),
            r: o.yaw_deg(),
        });
        self.positions.len()
    }

    fn termination(&self) -> String {
        if self.settings.cnt == 0 {
            "FINE".into()
        } else {
            format!("CNT{}", self.settings.cnt.min(100))
        }
    }

    fn position_lines(&self, index: usize, record: &PositionRecord) -> Vec<String> {
        let [x, y, z] = record.position;
        vec![
            format!("P[{}]{{", index),
            "   GP1:".into(),
            format!(
                "\tUF : {}, UT : {},\t\tCONFIG : 'N U T, 0, 0, 0',",
                self.settings.uframe, self.settings.utool
            ),
            format!(
                "\tX = {} mm,\tY = {} mm,\tZ = {} mm,",
                format_coord(x, 3),
                format_coord(y, 3),
                format_coord(z, 3)
            ),
            format!(
                "\tW = {} deg,\tP = {} deg,\tR = {} deg",
                format_coord(record.w, 3),
                format_coord(record.p, 3),
                format_coord(record.r, 3)
            ),
            "};".into(),
        ]
    }
}

impl VendorBackend for FanucBackend {
    fn header(&mut self, summary: &ToolpathSummary) -> Vec<String> {
        self.line_number = 0;
        self.positions.clear();

        let mut lines = vec![
            format!("/PROG  {}", self.program_name),
            "/ATTR".into(),
            "OWNER\t\t= MNEDITOR;".into(),
            "COMMENT\t\t= \"postforge\";".into(),
            "PROG_SIZE\t= 0;".into(),
            "FILE_NAME\t= ;".into(),
            "VERSION\t\t= 0;".into(),
            "MEMORY_SIZE\t= 0;".into(),
            "PROTECT\t\t= READ_WRITE;".into(),
            "DEFAULT_GROUP\t= 1,*,*,*,*;".into(),
            "CONTROL_CODE\t= 00000000 00000000;".into(),
            "/MN".into(),
        ];
        for text in summary_lines(Dialect::Fanuc, &self.program_name, summary) {
            let line = self.comment(&text);
            lines.push(line);
        }
        let uframe = format!("UFRAME_NUM={}", self.settings.uframe);
        let utool = format!("UTOOL_NUM={}", self.settings.utool);
        lines.push(self.numbered(&uframe));
        lines.push(self.numbered(&utool));
        lines
    }

    fn footer(&mut self) -> Vec<String> {
        let mut lines = vec!["/POS".to_string()];
        for (i, record) in self.positions.iter().enumerate() {
            lines.extend(self.position_lines(i + 1, record));
        }
        lines.push("/END".into());
        lines
    }

    fn depositing_move(&mut self, ctx: &PointContext) -> Vec<String> {
        let index = self.register(ctx);
        let speed = ctx.speed.round().max(1.0);
        let body = format!("L P[{}] {}mm/sec {}", index, speed, self.termination());
        vec![self.numbered(&body)]
    }

    fn traveling_move(&mut self, ctx: &PointContext) -> Vec<String> {
        let index = self.register(ctx);
        let body = format!(
            "J P[{}] {}% {}",
            index,
            self.settings.joint_speed_percent.clamp(1, 100),
            self.termination()
        );
        vec![self.numbered(&body)]
    }

    fn comment(&mut self, text: &str) -> String {
        self.numbered(&format!("! {}", text))
    }

    fn process_on(&mut self, _ctx: &PointContext) -> Vec<String> {
        let body = format!("DO[{}]=ON", self.settings.process_output);
        vec![self.numbered(&body)]
    }

    fn process_off(&mut self, _ctx: &PointContext) -> Vec<String> {
        let body = format!("DO[{}]=OFF", self.settings.process_output);
        vec![self.numbered(&body)]
    }

    fn layer_change(&mut self, layer: u32) -> Vec<String> {
        vec![self.comment(&format!("Layer {}", layer))]
    }

    fn instruction(&mut self, text: &str) -> String {
        let body = text.trim().trim_end_matches(';').trim_end();
        self.numbered(body)
    }
}
