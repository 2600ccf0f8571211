use std::io::{self, Write};

use crate::report::format::format_row;
use crate::types::{ClusterRow, OutputConfig};

pub fn write_rows(rows: &[ClusterRow], output: &OutputConfig) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match write_rows_to(&mut out, rows, output) {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

pub fn write_rows_to<W: Write>(out: &mut W, rows: &[ClusterRow], output: &OutputConfig) -> io::Result<()> {
    for row in rows {
        let line = format_row(row, output);
        out.write_all(line.as_bytes())?;
        out.write_all(b"\n")?;
    }
    out.flush()
}
