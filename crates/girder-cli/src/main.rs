//! girder CLI - terminal viewer for rolled steel sections
//!
//! Renders UC/UB sections as interactive, true-to-dimension 3D solids in
//! the terminal, and provides thin info/export/list helpers around the
//! same pipeline.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod app;
mod ui;

use girder::{
    extrude_profile, open_view, section_mesh, ExtrusionConfig, SectionCatalog, SectionFamily,
    SectionProfile, SectionProperties, SectionRecord,
};

#[derive(Parser)]
#[command(name = "girder")]
#[command(about = "Terminal 3D viewer for UC/UB steel sections", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive 3D viewer
    View {
        #[command(flatten)]
        section: SectionArgs,
    },
    /// Render a single frame to a PNG image
    Snapshot {
        #[command(flatten)]
        section: SectionArgs,
        /// Output PNG file
        output: PathBuf,
        /// Image width in pixels
        #[arg(long, default_value_t = 960)]
        width: u32,
        /// Image height in pixels
        #[arg(long, default_value_t = 540)]
        height: u32,
    },
    /// Print profile, mesh, and section property summary
    Info {
        #[command(flatten)]
        section: SectionArgs,
    },
    /// Export the extruded solid as binary STL
    Export {
        #[command(flatten)]
        section: SectionArgs,
        /// Output STL file
        output: PathBuf,
    },
    /// List the sections in a catalog file
    List {
        /// JSON catalog file
        catalog: PathBuf,
    },
}

/// Where the section comes from: a catalog row, or raw dimensions.
#[derive(Args)]
struct SectionArgs {
    /// JSON catalog file to read sections from
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Designation to look up in the catalog
    #[arg(long)]
    designation: Option<String>,

    /// Section family, UC or UB (defaults to the catalog's family)
    #[arg(long)]
    family: Option<SectionFamily>,

    /// Overall height in mm (raw-dimension mode)
    #[arg(long = "height")]
    height_mm: Option<f64>,

    /// Flange width in mm (raw-dimension mode)
    #[arg(long = "width")]
    width_mm: Option<f64>,

    /// Web thickness in mm (raw-dimension mode)
    #[arg(long = "web")]
    web_mm: Option<f64>,

    /// Flange thickness in mm (raw-dimension mode)
    #[arg(long = "flange")]
    flange_mm: Option<f64>,

    /// Root fillet radius in mm (raw-dimension mode)
    #[arg(long = "root-radius")]
    root_radius_mm: Option<f64>,
}

impl SectionArgs {
    fn resolve(self) -> Result<(SectionRecord, SectionFamily)> {
        let (record, family) = if let Some(path) = &self.catalog {
            let json = std::fs::read_to_string(path)?;
            let catalog = SectionCatalog::from_json(&json)?;
            let designation = self
                .designation
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("--designation is required with --catalog"))?;
            let record = catalog.find(designation)?.clone();
            (record, self.family.unwrap_or(catalog.family))
        } else {
            let family = self
                .family
                .ok_or_else(|| anyhow::anyhow!("--family is required without a catalog"))?;
            let (Some(h), Some(w), Some(tw), Some(tf), Some(r)) = (
                self.height_mm,
                self.width_mm,
                self.web_mm,
                self.flange_mm,
                self.root_radius_mm,
            ) else {
                anyhow::bail!(
                    "raw-dimension mode needs --height, --width, --web, --flange and --root-radius"
                );
            };
            let designation = self.designation.unwrap_or_else(|| "custom".to_string());
            (SectionRecord::new(designation, h, w, tw, tf, r), family)
        };

        record.validate()?;
        Ok((record, family))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::View { section } => {
            let (record, family) = section.resolve()?;
            app::run_viewer(record, family)?;
        }
        Commands::Snapshot {
            section,
            output,
            width,
            height,
        } => {
            let (record, family) = section.resolve()?;
            snapshot(&record, family, &output, width, height)?;
        }
        Commands::Info { section } => {
            let (record, family) = section.resolve()?;
            show_info(&record, family)?;
        }
        Commands::Export { section, output } => {
            let (record, family) = section.resolve()?;
            let mesh = section_mesh(&record, family)?;
            girder::export::write_stl(&mesh, &output)?;
            println!("Exported STL to {}", output.display());
        }
        Commands::List { catalog } => {
            list_catalog(&catalog)?;
        }
    }

    Ok(())
}

fn snapshot(
    record: &SectionRecord,
    family: SectionFamily,
    output: &PathBuf,
    width: u32,
    height: u32,
) -> Result<()> {
    let mut view = open_view(record, family, width, height)?;
    let frame = view.scene.render_frame()?;
    let image = image::RgbaImage::from_raw(width, height, frame)
        .ok_or_else(|| anyhow::anyhow!("frame size mismatch"))?;
    image.save(output)?;
    view.close();
    println!("Wrote {}", output.display());
    Ok(())
}

fn show_info(record: &SectionRecord, family: SectionFamily) -> Result<()> {
    let profile = SectionProfile::from_record(record)?;
    let config = ExtrusionConfig::for_section(record, family);
    let mesh = extrude_profile(&profile, &config);
    let props = SectionProperties::from_record(record);

    println!("{} ({})", record.designation, family);
    println!(
        "  Dimensions: h={} w={} tw={} tf={} r={} (mm)",
        record.height_mm,
        record.width_mm,
        record.web_thickness_mm,
        record.flange_thickness_mm,
        record.root_radius_mm
    );
    println!(
        "  Rendered solid: depth {:.3} m, chamfer {:.1} mm x {} segments",
        config.depth,
        config.bevel_size * 1000.0,
        config.bevel_segments
    );
    println!(
        "  Mesh: {} triangles, {} vertices, volume {:.4e} m^3 (~{:.1} kg of steel)",
        mesh.num_triangles(),
        mesh.num_vertices(),
        mesh.signed_volume(),
        mesh.signed_volume() * 7850.0
    );
    println!("  Properties (sharp-corner approximation):");
    println!(
        "    A = {:.1} cm^2, mass = {:.1} kg/m",
        props.area_cm2, props.mass_per_metre_kg
    );
    println!(
        "    Iy = {:.0} cm^4, Iz = {:.0} cm^4",
        props.second_moment_y_cm4, props.second_moment_z_cm4
    );
    println!(
        "    Wel,y = {:.0} cm^3, Wpl,y = {:.0} cm^3",
        props.elastic_modulus_y_cm3, props.plastic_modulus_y_cm3
    );
    println!(
        "    iy = {:.2} cm, iz = {:.2} cm, J = {:.1} cm^4",
        props.radius_of_gyration_y_cm, props.radius_of_gyration_z_cm, props.torsional_constant_cm4
    );

    Ok(())
}

fn list_catalog(path: &PathBuf) -> Result<()> {
    let json = std::fs::read_to_string(path)?;
    let catalog = SectionCatalog::from_json(&json)?;

    println!("{} sections ({})", catalog.len(), catalog.family);
    println!(
        "{:<20} {:>8} {:>8} {:>6} {:>6} {:>6} {:>8}",
        "Designation", "h (mm)", "w (mm)", "tw", "tf", "r", "kg/m"
    );
    for record in &catalog.sections {
        let props = SectionProperties::from_record(record);
        println!(
            "{:<20} {:>8.1} {:>8.1} {:>6.1} {:>6.1} {:>6.1} {:>8.1}",
            record.designation,
            record.height_mm,
            record.width_mm,
            record.web_thickness_mm,
            record.flange_thickness_mm,
            record.root_radius_mm,
            props.mass_per_metre_kg
        );
    }

    Ok(())
}
