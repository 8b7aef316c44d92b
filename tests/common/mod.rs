//! Shared fixtures: an in-memory gateway and a view driven by a `LocalPool`.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::cell::{Cell as Flag, RefCell};
use std::rc::Rc;

use futures::executor::LocalPool;
use futures::future::LocalBoxFuture;
use futures::task::LocalSpawnExt;

use ipdgrid::{
    Cell, CellWrite, FieldTable, GridConfig, GridError, GridEvent, GridView, PersistenceGateway,
    Position, Result, Spawner,
};

/// Columns of the test register
pub const UHID: u32 = 0;
pub const NAME: u32 = 1;
pub const WARD: u32 = 2;
pub const DOCTOR: u32 = 3;
pub const REMARKS: u32 = 4;
pub const PHARMACY: u32 = 5;
pub const LAB: u32 = 6;
pub const DISCHARGE: u32 = 7;

#[derive(Default)]
struct Inner {
    rows: RefCell<Vec<Vec<Cell>>>,
    writes: RefCell<Vec<CellWrite>>,
    fail_load: Flag<bool>,
    fail_writes: Flag<bool>,
}

/// Gateway that serves fixed rows and records every write
#[derive(Clone, Default)]
pub struct MemoryGateway {
    inner: Rc<Inner>,
}

impl MemoryGateway {
    pub fn with_rows(rows: Vec<Vec<Cell>>) -> Self {
        let gateway = Self::default();
        *gateway.inner.rows.borrow_mut() = rows;
        gateway
    }

    pub fn writes(&self) -> Vec<CellWrite> {
        self.inner.writes.borrow().clone()
    }

    pub fn fail_load(&self, fail: bool) {
        self.inner.fail_load.set(fail);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.inner.fail_writes.set(fail);
    }
}

impl PersistenceGateway for MemoryGateway {
    fn load_rows(&self) -> LocalBoxFuture<'static, Result<Vec<Vec<Cell>>>> {
        let inner = Rc::clone(&self.inner);
        Box::pin(async move {
            if inner.fail_load.get() {
                return Err(GridError::Load("backend unavailable".into()));
            }
            Ok(inner.rows.borrow().clone())
        })
    }

    fn write_cell(&self, write: CellWrite) -> LocalBoxFuture<'static, Result<()>> {
        let inner = Rc::clone(&self.inner);
        Box::pin(async move {
            inner.writes.borrow_mut().push(write);
            if inner.fail_writes.get() {
                return Err(GridError::Write("503 from backend".into()));
            }
            Ok(())
        })
    }
}

pub fn register_fields() -> FieldTable {
    FieldTable::new([
        "uhid",
        "patient_name",
        "ward",
        "doctor",
        "remarks",
        "pharmacy_status",
        "lab_status",
        "discharge_status",
    ])
}

pub fn register_config() -> GridConfig {
    GridConfig {
        leading_pinned: vec![UHID, NAME],
        trailing_pinned: vec![PHARMACY, LAB, DISCHARGE],
        pinned_header_rows: vec![0],
        status_columns: vec![PHARMACY, LAB, DISCHARGE],
        identity_column: UHID,
        fields: register_fields(),
        ..GridConfig::default()
    }
}

pub fn row(values: &[&str]) -> Vec<Cell> {
    values.iter().map(|v| Cell::new(*v)).collect()
}

pub fn register_rows() -> Vec<Vec<Cell>> {
    vec![
        row(&["UHID", "Patient", "Ward", "Doctor", "Remarks", "Pharmacy", "Lab", "Discharge"]),
        row(&["IPD-001", "Anita Sharma", "General", "Dr. Rao", "Cash", "", "", ""]),
        row(&["IPD-002", "Vikram Singh", "ICU", "Dr. Mehta", "cash flow pending", "", "", ""]),
        row(&["IPD-003", "Fatima Khan", "Maternity", "Dr. Rao", "Bank", "", "", ""]),
        row(&["", "Walk-in", "Casualty", "Dr. Iyer", "", "", "", ""]),
    ]
}

pub fn pos(row: u32, col: u32) -> Position {
    Position::new(row, col)
}

/// A view wired to a memory gateway and a single-threaded executor
pub struct Harness {
    pub view: GridView,
    pub gateway: MemoryGateway,
    pub pool: LocalPool,
}

impl Harness {
    /// Build a view over `rows` and load it
    pub fn with(config: GridConfig, rows: Vec<Vec<Cell>>) -> Self {
        let gateway = MemoryGateway::with_rows(rows);
        let pool = LocalPool::new();
        let local = pool.spawner();
        let spawner: Spawner = Rc::new(move |task: LocalBoxFuture<'static, ()>| {
            local.spawn_local(task).expect("spawn write");
        });
        let view = GridView::new(config, Rc::new(gateway.clone()), spawner).unwrap();
        let mut harness = Self {
            view,
            gateway,
            pool,
        };
        harness.load().unwrap();
        harness
    }

    pub fn new() -> Self {
        Self::with(register_config(), register_rows())
    }

    pub fn load(&mut self) -> Result<()> {
        let view = self.view.clone();
        self.pool.run_until(async move { view.load().await })
    }

    /// Let spawned writes complete
    pub fn settle(&mut self) {
        self.pool.run_until_stalled();
    }

    pub fn events(&self) -> Vec<GridEvent> {
        self.view.drain_events()
    }

    pub fn value(&self, row: u32, col: u32) -> String {
        self.view.cell_value(pos(row, col)).unwrap()
    }

    /// Double-click, type, press Enter
    pub fn edit(&self, row: u32, col: u32, text: &str) {
        self.view.double_click(pos(row, col));
        assert!(self.view.set_draft(text));
        assert!(self.view.key_down("Enter"));
    }
}
