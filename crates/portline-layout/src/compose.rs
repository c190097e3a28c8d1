#![forbid(unsafe_code)]

//! Reference line composer.
//!
//! Breaks a paragraph of plain text into lines of portions by driving
//! [`format_portion`] one portion at a time, the way a layout engine would:
//!
//! 1. Text is split at word bounds into words (each carrying the blanks
//!    that follow it), tabulators and hard breaks.
//! 2. Portions are appended to the line's chain and formatted. A portion
//!    that overflows is cut from the line and carried to the next one,
//!    unless it is the first on the line, in which case it is clipped.
//! 3. Trailing blanks of a broken line are split off into a hole so they
//!    neither count towards the line width nor get stretched.
//! 4. With justification on, every line except the last and lines ending
//!    in a hard break distributes its free width over its blanks.
//!
//! # Example
//!
//! ```
//! use portline_core::LayoutConfig;
//! use portline_layout::{LineComposer, MonospaceMeasurer};
//!
//! let composer = LineComposer::new(MonospaceMeasurer::new(10, 20, 15), LayoutConfig::new(100));
//! let paragraph = composer.compose("aaaa bbbb cccc").unwrap();
//! assert_eq!(paragraph.lines().len(), 2);
//! assert_eq!(paragraph.text_len(), 14);
//! ```

use std::iter::Peekable;

use portline_chain::{ChainError, Portion, PortionChain, PortionId, PortionKind};
use portline_core::config::{ConfigError, LayoutConfig};
use portline_core::direction::{FrameDirection, PaintDirection, TextDirection, is_counter_flow};
use portline_core::geometry::{Metrics, TextLen, Twips};
use unicode_bidi::BidiInfo;
use unicode_segmentation::UnicodeSegmentation;

use crate::format::{FormatInfo, FormatOutcome, NoopLineEnd, format_portion};
use crate::measure::Measurer;
use crate::mover::{PaintInfo, PlacedPortion, place_line};
use crate::spacing::{line_blanks, space_add_for};

/// Resolve the base direction of a paragraph.
///
/// Forced directions win; `Auto` takes the direction of the first strong
/// character, defaulting to left-to-right.
pub fn resolve_frame(direction: FrameDirection, text: &str) -> TextDirection {
    if let Some(forced) = direction.forced() {
        return forced;
    }
    let bidi = BidiInfo::new(text, None);
    match bidi.paragraphs.first() {
        Some(para) if para.level.is_rtl() => TextDirection::Rtl,
        _ => TextDirection::Ltr,
    }
}

/// Unit of text handed to the formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Atom {
    /// A word and the blanks following it.
    Word {
        len: TextLen,
        blanks: u16,
        metrics: Metrics,
    },
    Tab,
    Break {
        len: TextLen,
    },
}

/// Byte range of the word being collected.
#[derive(Debug, Clone, Copy)]
struct Run {
    start: usize,
    end: usize,
    blanks: usize,
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// One composed line.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedLine {
    /// Portions on the line, head first.
    pub chain: PortionChain,
    /// Character index of the line's first character.
    pub start: TextLen,
    /// Characters covered by the line, including hanging blanks and breaks.
    pub text_len: TextLen,
    /// Sum of print widths, before justification.
    pub width: Twips,
    pub height: Twips,
    pub ascent: Twips,
    /// Per-blank stretch applied when painting.
    pub space_add: Twips,
    /// Whether the line ends in a hard break.
    pub hard_break: bool,
}

impl ComposedLine {
    fn new(chain: PortionChain, start: TextLen, hard_break: bool) -> Self {
        let (height, ascent) = chain.iter().fold((0, 0), |(height, ascent), (_, p)| {
            (height.max(p.height()), ascent.max(p.ascent()))
        });
        Self {
            start,
            text_len: chain.text_len(),
            width: chain.width(),
            height,
            ascent,
            space_add: 0,
            hard_break,
            chain,
        }
    }

    /// Width including justification stretch.
    pub fn painted_width(&self) -> Twips {
        let blanks = Twips::try_from(line_blanks(&self.chain)).unwrap_or(Twips::MAX);
        self.width
            .saturating_add(blanks.saturating_mul(self.space_add))
    }

    /// Start positions of every portion, relative to the line origin.
    ///
    /// Lines painted against the frame direction start at their far edge
    /// and walk back towards zero, as do lines painted bottom to top.
    pub fn place(&self, direction: PaintDirection, frame: TextDirection) -> Vec<PlacedPortion> {
        let extent = self.painted_width();
        let (x, y) = if direction.is_rotated() {
            if direction == PaintDirection::BottomToTop {
                (0, extent)
            } else {
                (0, 0)
            }
        } else if is_counter_flow(frame, direction) {
            (extent, 0)
        } else {
            (0, 0)
        };
        let mut info = PaintInfo::new(direction, frame)
            .at(x, y)
            .with_idx(self.start)
            .with_space_add(self.space_add);
        place_line(&self.chain, &mut info)
    }
}

/// A paragraph broken into lines.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedParagraph {
    frame: TextDirection,
    direction: PaintDirection,
    lines: Vec<ComposedLine>,
}

impl ComposedParagraph {
    /// Resolved base direction.
    pub const fn frame(&self) -> TextDirection {
        self.frame
    }

    /// Paint direction taken from the composer's configuration.
    pub const fn paint_direction(&self) -> PaintDirection {
        self.direction
    }

    pub fn lines(&self) -> &[ComposedLine] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<ComposedLine> {
        self.lines
    }

    /// Characters covered by all lines.
    pub fn text_len(&self) -> TextLen {
        self.lines.iter().map(|line| line.text_len).sum()
    }

    /// Stacked height of all lines.
    pub fn height(&self) -> Twips {
        self.lines
            .iter()
            .fold(0, |height: Twips, line| height.saturating_add(line.height))
    }

    /// Place every line in the configured paint direction.
    pub fn place(&self) -> Vec<Vec<PlacedPortion>> {
        self.place_with(self.direction)
    }

    /// Place every line, stacking lines across `direction`.
    pub fn place_with(&self, direction: PaintDirection) -> Vec<Vec<PlacedPortion>> {
        let mut offset: Twips = 0;
        self.lines
            .iter()
            .map(|line| {
                let mut placed = line.place(direction, self.frame);
                for portion in &mut placed {
                    if direction.is_rotated() {
                        portion.x += offset;
                    } else {
                        portion.y += offset;
                    }
                }
                offset = offset.saturating_add(line.height);
                placed
            })
            .collect()
    }
}

/// Breaks text into lines with a [`Measurer`] and a [`LayoutConfig`].
#[derive(Debug, Clone)]
pub struct LineComposer<M> {
    measurer: M,
    config: LayoutConfig,
}

impl<M: Measurer> LineComposer<M> {
    /// Create a composer, raising a non-positive width or tab stop to one
    /// twip.
    pub fn new(measurer: M, mut config: LayoutConfig) -> Self {
        if config.max_width <= 0 {
            portline_core::warn!(max_width = config.max_width, "raising line width to 1");
            config.max_width = 1;
        }
        if config.tab_stop <= 0 {
            portline_core::warn!(tab_stop = config.tab_stop, "raising tab stop to 1");
            config.tab_stop = 1;
        }
        Self { measurer, config }
    }

    /// Create a composer, rejecting a config that fails validation.
    pub fn try_new(measurer: M, config: LayoutConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { measurer, config })
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn measurer(&self) -> &M {
        &self.measurer
    }

    /// Compose one paragraph.
    ///
    /// Empty text yields a single line holding a marker, so the paragraph
    /// keeps a line height.
    pub fn compose(&self, text: &str) -> Result<ComposedParagraph, ChainError> {
        let frame = resolve_frame(self.config.frame_direction, text);
        let mut atoms = self.tokenize(text).into_iter().peekable();
        let mut lines = Vec::new();
        let mut carry = None;
        let mut start = 0;

        loop {
            let first = match carry.take() {
                Some(portion) => portion,
                None => match atoms.next() {
                    Some(atom) => self.portion_for(atom, 0),
                    None => break,
                },
            };
            let line = self.compose_line(first, &mut atoms, &mut carry, start)?;
            start += line.text_len;
            lines.push(line);
        }

        if lines.is_empty() {
            let metrics = self.measurer.measure("");
            let marker = Portion::marker().with_metrics(Metrics::new(0, metrics.height, metrics.ascent));
            lines.push(ComposedLine::new(PortionChain::new(marker), 0, false));
        }

        if self.config.justify {
            let last = lines.len() - 1;
            for line in lines[..last].iter_mut().filter(|line| !line.hard_break) {
                line.space_add = space_add_for(&line.chain, self.config.max_width);
            }
        }

        portline_core::debug!(
            lines = lines.len(),
            text_len = start,
            frame = frame.as_str(),
            "composed paragraph"
        );
        Ok(ComposedParagraph {
            frame,
            direction: self.config.paint_direction,
            lines,
        })
    }

    fn compose_line<I>(
        &self,
        first: Portion,
        atoms: &mut Peekable<I>,
        carry: &mut Option<Portion>,
        start: TextLen,
    ) -> Result<ComposedLine, ChainError>
    where
        I: Iterator<Item = Atom>,
    {
        let mut chain = PortionChain::new(first);
        let head = chain.head();
        let mut info = FormatInfo::new(self.config.max_width);
        let mut hook = NoopLineEnd;
        let mut id = head;
        // Unclipped width of the last committed portion.
        let mut tail_width = chain.portion(head)?.width();
        let mut hard_break = false;
        let mut soft_break = false;

        loop {
            let measured = chain.portion(id)?.metrics();
            match format_portion(&mut chain, id, &mut info, &mut hook)? {
                FormatOutcome::Fits => {
                    info.commit(&chain, id)?;
                    tail_width = measured.width;
                    if chain.portion(id)?.is_break() {
                        hard_break = true;
                        break;
                    }
                    let Some(atom) = atoms.next() else { break };
                    id = chain.append_at_tail(id, self.portion_for(atom, info.x))?;
                }
                FormatOutcome::LineFull => {
                    let clipped = chain.portion(id)?.print_width() < measured.width;
                    if clipped && id != head {
                        *carry = Some(self.carry_over(&mut chain, head, id, measured)?);
                        soft_break = true;
                        break;
                    }
                    info.commit(&chain, id)?;
                    tail_width = measured.width;
                    // A hard break right at the limit stays on the full line.
                    if let Some(atom) = atoms.next_if(|atom| matches!(atom, Atom::Break { .. })) {
                        let brk = chain.append_at_tail(id, self.portion_for(atom, info.x))?;
                        format_portion(&mut chain, brk, &mut info, &mut hook)?;
                        info.commit(&chain, brk)?;
                        hard_break = true;
                    } else {
                        soft_break = true;
                    }
                    break;
                }
                FormatOutcome::Underflow => {
                    if id != head {
                        *carry = Some(self.carry_over(&mut chain, head, id, measured)?);
                    }
                    soft_break = true;
                    break;
                }
            }
        }

        if soft_break {
            self.hang_trailing_blanks(&mut chain, tail_width)?;
        }
        if self.config.verify_chains {
            chain.verify()?;
        }

        let line = ComposedLine::new(chain, start, hard_break);
        portline_core::debug!(
            start,
            text_len = line.text_len,
            width = line.width,
            hard_break,
            "committed line"
        );
        Ok(line)
    }

    /// Take `id` off the line and restore it for the next one.
    fn carry_over(
        &self,
        chain: &mut PortionChain,
        head: PortionId,
        id: PortionId,
        measured: Metrics,
    ) -> Result<Portion, ChainError> {
        let mut portion = chain.cut(head, id)?;
        if portion.is_tab() {
            portion = self.tab_at(0);
        } else {
            portion.set_metrics(measured);
        }
        portline_core::trace!(portion = %id, len = portion.len(), "carried to next line");
        Ok(portion)
    }

    /// Split the blanks off the line's last text portion into a hole.
    ///
    /// `measured` is the tail's width before formatting; a tail clipped to
    /// the line keeps its clipped width unless the word alone is narrower.
    fn hang_trailing_blanks(
        &self,
        chain: &mut PortionChain,
        measured: Twips,
    ) -> Result<(), ChainError> {
        let tail = chain.find_last(chain.head())?;
        let portion = chain.portion(tail)?;
        let blanks = match portion.kind() {
            PortionKind::Text { blanks } if *blanks > 0 => *blanks,
            _ => return Ok(()),
        };

        let hole_len = TextLen::from(blanks).min(portion.len());
        let word_len = portion.len() - hole_len;
        let metrics = portion.metrics();
        let flags = portion.flags();
        let blank_width = self
            .measurer
            .blank_width()
            .saturating_mul(Twips::from(blanks));
        let hole =
            Portion::hole(hole_len).with_metrics(Metrics::new(0, metrics.height, metrics.ascent));

        if word_len == 0 {
            *chain.portion_mut(tail)? = hole.with_flags(flags);
        } else {
            let word_width = metrics
                .width
                .min(measured.saturating_sub(blank_width))
                .max(0);
            *chain.portion_mut(tail)? = Portion::text(word_len, 0)
                .with_metrics(Metrics::new(word_width, metrics.height, metrics.ascent))
                .with_flags(flags);
            chain.insert_after(tail, hole)?;
        }
        portline_core::trace!(portion = %tail, blanks, "hung trailing blanks");
        Ok(())
    }

    /// Tabulator advancing from `x` to the next tab stop.
    fn tab_at(&self, x: Twips) -> Portion {
        let step = self.config.tab_stop.max(1);
        let stop = x.div_euclid(step).saturating_add(1).saturating_mul(step);
        Portion::tab(stop).with_width(stop.saturating_sub(x))
    }

    fn portion_for(&self, atom: Atom, x: Twips) -> Portion {
        match atom {
            Atom::Word {
                len,
                blanks,
                metrics,
            } => Portion::text(len, blanks).with_metrics(metrics),
            Atom::Tab => self.tab_at(x),
            Atom::Break { len } => {
                let mut portion = Portion::line_break();
                portion.set_len(len);
                portion
            }
        }
    }

    fn tokenize(&self, text: &str) -> Vec<Atom> {
        let mut atoms = Vec::new();
        let mut run: Option<Run> = None;

        for (offset, segment) in text.split_word_bound_indices() {
            if !segment.chars().all(char::is_whitespace) {
                match run.as_mut() {
                    Some(word) if word.blanks == 0 => word.end = offset + segment.len(),
                    _ => {
                        self.flush(text, &mut run, &mut atoms);
                        run = Some(Run {
                            start: offset,
                            end: offset + segment.len(),
                            blanks: 0,
                        });
                    }
                }
                continue;
            }

            if segment == "\r\n" {
                self.flush(text, &mut run, &mut atoms);
                atoms.push(Atom::Break { len: 2 });
                continue;
            }

            for (i, c) in segment.char_indices() {
                let at = offset + i;
                if is_line_break(c) {
                    self.flush(text, &mut run, &mut atoms);
                    atoms.push(Atom::Break { len: 1 });
                } else if c == '\t' {
                    self.flush(text, &mut run, &mut atoms);
                    atoms.push(Atom::Tab);
                } else {
                    let word = run.get_or_insert(Run {
                        start: at,
                        end: at,
                        blanks: 0,
                    });
                    word.end = at + c.len_utf8();
                    word.blanks += 1;
                }
            }
        }
        self.flush(text, &mut run, &mut atoms);
        atoms
    }

    fn flush(&self, text: &str, run: &mut Option<Run>, atoms: &mut Vec<Atom>) {
        let Some(word) = run.take() else { return };
        let slice = &text[word.start..word.end];
        atoms.push(Atom::Word {
            len: slice.chars().count(),
            blanks: u16::try_from(word.blanks).unwrap_or(u16::MAX),
            metrics: self.measurer.measure(slice),
        });
    }
}
