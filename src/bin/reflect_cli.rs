#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(err) = native::run() {
        eprintln!("reflect_cli error: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use ghx_reflect::geom::{
        Line3, PolyMesh, RayExtent, ReflectOptions, ReflectionResult, reflect_lines,
    };
    use std::fmt::Write as _;
    use std::fs::{self, File};
    use std::io::{BufWriter, Write};
    use std::path::{Path, PathBuf};

    const SNAPSHOT_QUANTIZE: f64 = 1e-6;
    const SNAPSHOT_DECIMALS: usize = 6;

    const USAGE: &str = r#"reflect_cli (ghx-reflect)

USAGE:
  reflect_cli list
  reflect_cli run <scenario|all> [options]

SCENARIOS:
  square_vertical
  tilted_panel
  stacked_panels
  square_misses
  square_unbounded

OPTIONS (run):
  --out-dir <dir>    Write <scenario>.obj and/or <scenario>.snap to this dir (required for `all`)
  --obj <path>       Write OBJ (single scenario only)
  --snap <path>      Write golden-style snapshot (single scenario only)
  --no-obj           Skip OBJ when using --out-dir
  --no-snap          Skip snapshot when using --out-dir
  --overwrite        Overwrite existing output files
  -h, --help         Show this help
"#;

    pub fn run() -> Result<(), String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut args = Args::new(args);

        let Some(command) = args.next() else {
            print_usage();
            return Ok(());
        };

        match command.as_str() {
            "list" => {
                print_scenarios();
                Ok(())
            }
            "run" => cmd_run(&mut args),
            "-h" | "--help" | "help" => {
                print_usage();
                Ok(())
            }
            other => Err(format!("unknown command `{other}`\n\n{USAGE}")),
        }
    }

    fn print_usage() {
        println!("{USAGE}");
    }

    fn print_scenarios() {
        for scenario in Scenario::ALL {
            println!("{}", scenario.name());
        }
    }

    fn cmd_run(args: &mut Args) -> Result<(), String> {
        let scenario_name = args.next().ok_or("missing scenario name")?;

        let mut out_dir: Option<PathBuf> = None;
        let mut obj_path: Option<PathBuf> = None;
        let mut snap_path: Option<PathBuf> = None;
        let mut overwrite = false;
        let mut write_obj = true;
        let mut write_snap = true;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--out-dir" => out_dir = Some(PathBuf::from(args.value("--out-dir")?)),
                "--obj" => obj_path = Some(PathBuf::from(args.value("--obj")?)),
                "--snap" => snap_path = Some(PathBuf::from(args.value("--snap")?)),
                "--overwrite" => overwrite = true,
                "--no-obj" => write_obj = false,
                "--no-snap" => write_snap = false,
                "-h" | "--help" => {
                    print_usage();
                    return Ok(());
                }
                other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
            }
        }

        if let Some(dir) = out_dir.as_ref() {
            if obj_path.is_some() || snap_path.is_some() {
                return Err("use either --out-dir or --obj/--snap (not both)".to_string());
            }
            if !write_obj && !write_snap {
                return Err("nothing to write (both --no-obj and --no-snap set)".to_string());
            }

            fs::create_dir_all(dir).map_err(|e| format!("create out dir: {e}"))?;

            if scenario_name == "all" {
                for scenario in Scenario::ALL {
                    run_one_scenario_to_dir(*scenario, dir, write_obj, write_snap, overwrite)?;
                }
                return Ok(());
            }

            let scenario = Scenario::from_str(scenario_name.as_str())
                .ok_or_else(|| unknown_scenario(&scenario_name))?;
            return run_one_scenario_to_dir(scenario, dir, write_obj, write_snap, overwrite);
        }

        if scenario_name == "all" {
            return Err("`run all` requires --out-dir".to_string());
        }

        let scenario = Scenario::from_str(scenario_name.as_str())
            .ok_or_else(|| unknown_scenario(&scenario_name))?;
        let output = run_scenario(scenario)?;

        if let Some(path) = snap_path.as_deref() {
            write_text_file(path, &output.snapshot, overwrite)?;
            eprintln!("wrote {}", path.display());
        } else {
            print!("{}", output.snapshot);
        }

        if let Some(path) = obj_path.as_deref() {
            write_obj_file(path, &output, overwrite)?;
            eprintln!("wrote {}", path.display());
        }

        print_summary(&output);
        Ok(())
    }

    fn run_one_scenario_to_dir(
        scenario: Scenario,
        dir: &Path,
        write_obj: bool,
        write_snap: bool,
        overwrite: bool,
    ) -> Result<(), String> {
        let output = run_scenario(scenario)?;

        if write_snap {
            let path = dir.join(format!("{}.snap", output.name));
            write_text_file(&path, &output.snapshot, overwrite)?;
            eprintln!("wrote {}", path.display());
        }

        if write_obj {
            let path = dir.join(format!("{}.obj", output.name));
            write_obj_file(&path, &output, overwrite)?;
            eprintln!("wrote {}", path.display());
        }

        print_summary(&output);
        Ok(())
    }

    fn print_summary(output: &ScenarioOutput) {
        let diag = output.result.diagnostics;
        eprintln!(
            "{}: inputs={} hits={} misses={} degenerate={}",
            output.name, diag.input_count, diag.hit_count, diag.miss_count, diag.degenerate_count
        );
    }

    fn unknown_scenario(name: &str) -> String {
        let mut msg = format!("unknown scenario `{name}`\n\navailable scenarios:\n");
        for scenario in Scenario::ALL {
            let _ = writeln!(msg, "  {}", scenario.name());
        }
        msg
    }

    fn ensure_writable(path: &Path, overwrite: bool) -> Result<(), String> {
        if path.exists() && !overwrite {
            return Err(format!(
                "refusing to overwrite existing file {} (use --overwrite)",
                path.display()
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("create dir {}: {e}", parent.display()))?;
        }
        Ok(())
    }

    fn write_text_file(path: &Path, text: &str, overwrite: bool) -> Result<(), String> {
        ensure_writable(path, overwrite)?;
        fs::write(path, normalize_snapshot_text(text))
            .map_err(|e| format!("write {}: {e}", path.display()))
    }

    /// Mesh as `f` records, then the incoming and outgoing segments as `l`
    /// records in separate groups.
    fn write_obj_file(path: &Path, output: &ScenarioOutput, overwrite: bool) -> Result<(), String> {
        ensure_writable(path, overwrite)?;

        let file = File::create(path).map_err(|e| format!("create {}: {e}", path.display()))?;
        let mut w = BufWriter::new(file);
        write_obj(&mut w, output).map_err(|e| format!("write obj: {e}"))?;
        w.flush().map_err(|e| format!("flush {}: {e}", path.display()))
    }

    fn write_obj(w: &mut impl Write, output: &ScenarioOutput) -> std::io::Result<()> {
        writeln!(w, "# ghx-reflect reflect_cli")?;
        writeln!(w, "o {}", output.name)?;

        for p in &output.mesh.vertices {
            writeln!(w, "v {} {} {}", p[0], p[1], p[2])?;
        }
        writeln!(w, "g mesh")?;
        for face in &output.mesh.faces {
            write!(w, "f")?;
            for idx in face {
                write!(w, " {}", idx + 1)?;
            }
            writeln!(w)?;
        }

        let mut next_vertex = output.mesh.vertices.len() + 1;
        for (group, segments) in [
            ("lines_in", &output.result.incoming_segments),
            ("lines_out", &output.result.outgoing_segments),
        ] {
            writeln!(w, "g {group}")?;
            for segment in segments {
                let (a, b) = segment.to_arrays();
                writeln!(w, "v {} {} {}", a[0], a[1], a[2])?;
                writeln!(w, "v {} {} {}", b[0], b[1], b[2])?;
                writeln!(w, "l {} {}", next_vertex, next_vertex + 1)?;
                next_vertex += 2;
            }
        }
        Ok(())
    }

    fn normalize_snapshot_text(text: &str) -> String {
        let normalized = text.replace("\r\n", "\n");
        if normalized.ends_with('\n') {
            normalized
        } else {
            format!("{normalized}\n")
        }
    }

    fn quantize_f64(value: f64) -> f64 {
        if !value.is_finite() {
            return value;
        }
        let value = if value == -0.0 { 0.0 } else { value };
        let q = (value / SNAPSHOT_QUANTIZE).round() * SNAPSHOT_QUANTIZE;
        if q == -0.0 { 0.0 } else { q }
    }

    fn write_f64(out: &mut String, value: f64) {
        let value = quantize_f64(value);
        let _ = write!(out, "{value:.SNAPSHOT_DECIMALS$}");
    }

    fn write_f64_line(out: &mut String, prefix: &str, value: f64) {
        let _ = write!(out, "{prefix} ");
        write_f64(out, value);
        out.push('\n');
    }

    fn write_vec3_line(out: &mut String, prefix: &str, v: [f64; 3]) {
        let _ = write!(out, "{prefix} ");
        write_f64(out, v[0]);
        out.push(' ');
        write_f64(out, v[1]);
        out.push(' ');
        write_f64(out, v[2]);
        out.push('\n');
    }

    fn write_result(out: &mut String, result: &ReflectionResult) {
        let diag = result.diagnostics;
        let _ = writeln!(out, "diag.input_count {}", diag.input_count);
        let _ = writeln!(out, "diag.hit_count {}", diag.hit_count);
        let _ = writeln!(out, "diag.miss_count {}", diag.miss_count);
        let _ = writeln!(out, "diag.degenerate_count {}", diag.degenerate_count);

        let _ = writeln!(out, "hits {}", result.len());
        for (k, hit) in result.hits.iter().enumerate() {
            let _ = writeln!(out, "hit.{k} input {} face {}", hit.input_index, hit.face_index);
            write_f64_line(out, "t", hit.ray_parameter);
            write_vec3_line(out, "pt", result.hit_points[k].to_array());
            write_vec3_line(out, "in.start", result.incoming_segments[k].start.to_array());
            write_vec3_line(out, "in.end", result.incoming_segments[k].end.to_array());
            write_vec3_line(out, "out.start", result.outgoing_segments[k].start.to_array());
            write_vec3_line(out, "out.end", result.outgoing_segments[k].end.to_array());
            write_vec3_line(out, "vin", result.incoming_directions[k].to_array());
            write_vec3_line(out, "vref", result.reflected_directions[k].to_array());
            write_vec3_line(out, "normal", result.face_normals[k].to_array());
        }
    }

    fn snapshot(op: &str, length: f64, options: &ReflectOptions, result: &ReflectionResult) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# ghx-reflect golden v1");
        let _ = writeln!(out, "op {op}");
        let _ = writeln!(out, "quantize {SNAPSHOT_QUANTIZE:.1e}");
        let _ = writeln!(out, "extent {:?}", options.extent);
        write_f64_line(&mut out, "length", length);
        write_result(&mut out, result);
        normalize_snapshot_text(&out)
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Scenario {
        SquareVertical,
        TiltedPanel,
        StackedPanels,
        SquareMisses,
        SquareUnbounded,
    }

    impl Scenario {
        const ALL: &'static [Scenario] = &[
            Scenario::SquareVertical,
            Scenario::TiltedPanel,
            Scenario::StackedPanels,
            Scenario::SquareMisses,
            Scenario::SquareUnbounded,
        ];

        fn name(self) -> &'static str {
            match self {
                Scenario::SquareVertical => "square_vertical",
                Scenario::TiltedPanel => "tilted_panel",
                Scenario::StackedPanels => "stacked_panels",
                Scenario::SquareMisses => "square_misses",
                Scenario::SquareUnbounded => "square_unbounded",
            }
        }

        fn from_str(name: &str) -> Option<Self> {
            Self::ALL.iter().copied().find(|scenario| scenario.name() == name)
        }
    }

    struct ScenarioOutput {
        name: &'static str,
        mesh: PolyMesh,
        result: ReflectionResult,
        snapshot: String,
    }

    struct ScenarioInput {
        mesh: PolyMesh,
        lines: Vec<Line3>,
        length: f64,
        options: ReflectOptions,
    }

    fn run_scenario(scenario: Scenario) -> Result<ScenarioOutput, String> {
        let input = match scenario {
            Scenario::SquareVertical => scenario_square_vertical(),
            Scenario::TiltedPanel => scenario_tilted_panel(),
            Scenario::StackedPanels => scenario_stacked_panels(),
            Scenario::SquareMisses => scenario_square_misses(),
            Scenario::SquareUnbounded => scenario_square_unbounded(),
        };

        let result = reflect_lines(&input.lines, &input.mesh, input.length, &input.options)
            .map_err(|e| e.to_string())?;
        let name = scenario.name();
        let snapshot = snapshot(name, input.length, &input.options, &result);

        Ok(ScenarioOutput {
            name,
            mesh: input.mesh,
            result,
            snapshot,
        })
    }

    fn unit_square() -> PolyMesh {
        PolyMesh::new(
            vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
            ],
            vec![vec![0, 1, 2], vec![0, 2, 3]],
        )
    }

    fn scenario_square_vertical() -> ScenarioInput {
        ScenarioInput {
            mesh: unit_square(),
            lines: vec![
                Line3::from_arrays([0.5, 0.25, -1.0], [0.5, 0.25, 1.0]),
                Line3::from_arrays([0.25, 0.75, 2.0], [0.25, 0.75, -2.0]),
                Line3::from_arrays([3.0, 3.0, -1.0], [3.0, 3.0, 1.0]),
                Line3::from_arrays([0.2, 0.1, 0.5], [1.2, 0.1, -0.5]),
            ],
            length: 2.0,
            options: ReflectOptions::default(),
        }
    }

    fn scenario_tilted_panel() -> ScenarioInput {
        ScenarioInput {
            mesh: PolyMesh::new(
                vec![
                    [0.0, 0.0, 0.0],
                    [1.0, 0.0, 0.0],
                    [1.0, 1.0, 1.0],
                    [0.0, 1.0, 1.0],
                ],
                vec![vec![0, 1, 2, 3]],
            ),
            lines: vec![
                Line3::from_arrays([0.6, 0.5, 2.0], [0.6, 0.5, -1.0]),
                Line3::from_arrays([0.3, -1.0, 0.25], [0.3, 2.0, 0.25]),
            ],
            length: 1.5,
            options: ReflectOptions::default(),
        }
    }

    fn scenario_stacked_panels() -> ScenarioInput {
        ScenarioInput {
            mesh: PolyMesh::new(
                vec![
                    [0.0, 0.0, 0.0],
                    [1.0, 0.0, 0.0],
                    [1.0, 1.0, 0.0],
                    [0.0, 1.0, 0.0],
                    [0.0, 0.0, 1.0],
                    [1.0, 0.0, 1.0],
                    [1.0, 1.0, 1.0],
                    [0.0, 1.0, 1.0],
                ],
                vec![vec![4, 5, 6, 7], vec![0, 1, 2, 3]],
            ),
            lines: vec![
                Line3::from_arrays([0.5, 0.25, -1.0], [0.5, 0.25, 3.0]),
                Line3::from_arrays([0.4, 0.6, 1.0], [0.4, 0.6, -1.0]),
            ],
            length: 1.0,
            options: ReflectOptions::default(),
        }
    }

    fn scenario_square_misses() -> ScenarioInput {
        ScenarioInput {
            mesh: unit_square(),
            lines: vec![
                Line3::from_arrays([0.0, 0.5, 1.0], [1.0, 0.5, 1.0]),
                Line3::from_arrays([3.0, 3.0, -1.0], [3.0, 3.0, 1.0]),
                Line3::from_arrays([0.5, 0.5, 1.0], [0.5, 0.5, 1.0]),
                Line3::from_arrays([0.5, 0.25, -2.0], [0.5, 0.25, -1.0]),
            ],
            length: 1.0,
            options: ReflectOptions::default(),
        }
    }

    fn scenario_square_unbounded() -> ScenarioInput {
        ScenarioInput {
            mesh: unit_square(),
            lines: vec![Line3::from_arrays([0.5, 0.25, -2.0], [0.5, 0.25, -1.0])],
            length: 1.0,
            options: ReflectOptions::default().with_extent(RayExtent::Unbounded),
        }
    }

    struct Args {
        args: Vec<String>,
        pos: usize,
    }

    impl Args {
        fn new(args: Vec<String>) -> Self {
            Self { args, pos: 0 }
        }

        fn next(&mut self) -> Option<String> {
            let arg = self.args.get(self.pos)?.clone();
            self.pos += 1;
            Some(arg)
        }

        fn value(&mut self, flag: &str) -> Result<String, String> {
            self.next().ok_or_else(|| format!("missing value for {flag}"))
        }
    }
}
