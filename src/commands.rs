//! Command execution for the metmasker binary.
//!
//! Each [`Command`] runs against the file-level pipeline and produces a
//! [`Report`], which renders as text or serializes to JSON. Batch commands
//! keep going after a per-file failure and record it in the report.

use ndarray::Axis;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::debug;

use crate::classifier::PALETTE;
use crate::codec;
use crate::config::{Command, Config};
use crate::error::Result;
use crate::logging::{
    log_error, log_operation_end, log_operation_start, log_raster_stats, log_timed_operation,
};
use crate::mask::{BoundingBox, Mask};
use crate::masker::{self, Masker};
use crate::raster::{Geometry, PixelLayout};

/// Total for one input of a batch command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TotalEntry {
    pub file: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_mm: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Masked pixel count of one rainfall channel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelCount {
    pub channel: usize,
    pub gray: u8,
    pub amount_mm: f32,
    pub pixels: usize,
}

/// Result of running a command
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "report", rename_all = "snake_case")]
pub enum Report {
    Totals {
        mask: PathBuf,
        source: &'static str,
        entries: Vec<TotalEntry>,
    },
    Channels {
        file: PathBuf,
        channels: Vec<ChannelCount>,
    },
    Grid {
        file: PathBuf,
        masked: bool,
        sum_mm: f32,
        max_mm: f32,
        nonzero_cells: usize,
    },
    Converted {
        input: PathBuf,
        output: PathBuf,
    },
    Inspect {
        file: PathBuf,
        layout: PixelLayout,
        color_type: u8,
        bytes_per_pixel: usize,
        geometry: Geometry,
        #[serde(skip_serializing_if = "Option::is_none")]
        bounds: Option<BoundingBox>,
        #[serde(skip_serializing_if = "Option::is_none")]
        set_pixels: Option<usize>,
    },
}

impl Report {
    /// Whether any entry of a batch report failed
    pub fn has_failures(&self) -> bool {
        match self {
            Report::Totals { entries, .. } => entries.iter().any(|entry| entry.error.is_some()),
            _ => false,
        }
    }

    /// Serialize as JSON
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Render in the configured format
    pub fn render(&self, config: &Config) -> Result<String> {
        match config.output.format.as_str() {
            "json" => self.to_json(config.output.pretty),
            _ => Ok(self.to_string()),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Totals {
                mask,
                source,
                entries,
            } => {
                writeln!(f, "mask: {} ({source})", mask.display())?;
                for entry in entries {
                    match (&entry.total_mm, &entry.error) {
                        (Some(total), _) => writeln!(f, "{}\t{total:.2} mm", entry.file.display())?,
                        (None, Some(error)) => {
                            writeln!(f, "{}\terror: {error}", entry.file.display())?
                        }
                        (None, None) => writeln!(f, "{}\t-", entry.file.display())?,
                    }
                }
                Ok(())
            }
            Report::Channels { file, channels } => {
                writeln!(f, "{}", file.display())?;
                for c in channels {
                    writeln!(
                        f,
                        "channel {} (gray {:>3}, {:>5} mm): {} px",
                        c.channel, c.gray, c.amount_mm, c.pixels
                    )?;
                }
                Ok(())
            }
            Report::Grid {
                file,
                masked,
                sum_mm,
                max_mm,
                nonzero_cells,
            } => writeln!(
                f,
                "{}{}: sum {sum_mm:.2} mm, max {max_mm:.2} mm, {nonzero_cells} wet cells",
                file.display(),
                if *masked { " (masked)" } else { "" }
            ),
            Report::Converted { input, output } => {
                writeln!(f, "{} -> {}", input.display(), output.display())
            }
            Report::Inspect {
                file,
                layout,
                color_type,
                geometry,
                bounds,
                set_pixels,
                ..
            } => {
                writeln!(f, "{}: {geometry}, {layout}, color type {color_type}", file.display())?;
                if let (Some(b), Some(set)) = (bounds, set_pixels) {
                    writeln!(
                        f,
                        "mask: {set} set pixels, x {}..{}, y {}..{}",
                        b.x_min, b.x_max, b.y_min, b.y_max
                    )?;
                }
                Ok(())
            }
        }
    }
}

/// Run a command with the given configuration
pub fn run(command: &Command, config: &Config) -> Result<Report> {
    match command {
        Command::TotalMet { mask, files } => totals(mask, files, config, "met", Masker::total_met),
        Command::TotalGray { mask, files } => {
            totals(mask, files, config, "gray", Masker::total_gray)
        }
        Command::Channels { mask, file } => channels(mask, file, config),
        Command::Grid { mask, file } => grid(mask.as_deref(), file, config),
        Command::Convert { input, output } => convert(input, output, config),
        Command::Inspect { file, as_mask } => inspect(file, *as_mask, config),
    }
}

fn open_mask(path: &Path, config: &Config) -> Result<Masker> {
    let masker = Masker::open(path, config.geometry).map_err(|e| {
        log_error(&e, "loading mask");
        e
    })?;
    log_raster_stats(path, masker.mask().raster());
    debug!(bounds = ?masker.mask().bounds(), "Mask bounds computed");
    Ok(masker)
}

fn totals(
    mask_path: &Path,
    files: &[PathBuf],
    config: &Config,
    source: &'static str,
    total: fn(&Masker, &Path) -> Result<f32>,
) -> Result<Report> {
    let operation = format!("total_{source}");
    let start = Instant::now();
    log_operation_start(&operation, Some(&format!("{} file(s)", files.len())));

    let masker = open_mask(mask_path, config)?;
    let entries: Vec<TotalEntry> = files
        .iter()
        .map(|file| match total(&masker, file) {
            Ok(mm) => TotalEntry {
                file: file.clone(),
                total_mm: Some(mm),
                error: None,
            },
            Err(e) => {
                log_error(&e, &operation);
                TotalEntry {
                    file: file.clone(),
                    total_mm: None,
                    error: Some(e.to_string()),
                }
            }
        })
        .collect();

    let report = Report::Totals {
        mask: mask_path.to_path_buf(),
        source,
        entries,
    };
    log_operation_end(&operation, start, !report.has_failures());
    Ok(report)
}

fn channels(mask_path: &Path, file: &Path, config: &Config) -> Result<Report> {
    let masker = open_mask(mask_path, config)?;
    let tensor = log_timed_operation("load_channels", || masker.load_channels(file))?;

    let per_channel = tensor.sum_axis(Axis(2)).sum_axis(Axis(1));
    let channels = PALETTE
        .iter()
        .zip(per_channel.iter())
        .enumerate()
        .map(|(channel, (row, &count))| ChannelCount {
            channel,
            gray: row.category.gray,
            amount_mm: row.category.amount_mm,
            pixels: count as usize,
        })
        .collect();

    Ok(Report::Channels {
        file: file.to_path_buf(),
        channels,
    })
}

fn grid(mask_path: Option<&Path>, file: &Path, config: &Config) -> Result<Report> {
    let grid = match mask_path {
        Some(mask_path) => {
            let masker = open_mask(mask_path, config)?;
            log_timed_operation("load_gray", || masker.load_gray(file))?
        }
        None => log_timed_operation("load_gray", || masker::load_gray(file, &config.geometry))?,
    };

    Ok(Report::Grid {
        file: file.to_path_buf(),
        masked: mask_path.is_some(),
        sum_mm: grid.sum(),
        max_mm: grid.iter().copied().fold(0.0, f32::max),
        nonzero_cells: grid.iter().filter(|&&mm| mm > 0.0).count(),
    })
}

fn convert(input: &Path, output: &Path, config: &Config) -> Result<Report> {
    let start = Instant::now();
    log_operation_start("met_to_gray", Some(&input.display().to_string()));

    let result = masker::met_to_gray(input, output, &config.geometry);
    log_operation_end("met_to_gray", start, result.is_ok());
    result?;

    Ok(Report::Converted {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
    })
}

fn inspect(file: &Path, as_mask: bool, config: &Config) -> Result<Report> {
    let raster = codec::decode(file, &config.geometry)?;
    log_raster_stats(file, &raster);

    let layout = raster.layout();
    let geometry = raster.geometry();
    let (bounds, set_pixels) = if as_mask {
        let mask = Mask::from_raster(raster);
        (Some(mask.bounds()), Some(mask.set_count()))
    } else {
        (None, None)
    };

    Ok(Report::Inspect {
        file: file.to_path_buf(),
        layout,
        color_type: layout.color_type_tag(),
        bytes_per_pixel: layout.bytes_per_pixel(),
        geometry,
        bounds,
        set_pixels,
    })
}
