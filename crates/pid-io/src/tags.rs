#[derive(Debug, Clone, Copy)]
pub struct Tag {
    pub metric: &'static str,
    pub help: &'static str,
}

pub const CYCLE: Tag = Tag {
    metric: "pidsim_cycle",
    help: "Index of the most recent cycle",
};

pub const TARGET_SPEED: Tag = Tag {
    metric: "pidsim_target_speed",
    help: "Controller setpoint",
};

pub const ACTUAL_SPEED: Tag = Tag {
    metric: "pidsim_actual_speed",
    help: "Motor speed after the last step",
};

pub const ERROR: Tag = Tag {
    metric: "pidsim_error",
    help: "Setpoint minus post-step motor speed",
};

pub const CONTROL_SIGNAL: Tag = Tag {
    metric: "pidsim_control_signal",
    help: "Controller output of the last cycle",
};

pub const ABS_ERROR: Tag = Tag {
    metric: "pidsim_abs_error",
    help: "Absolute tracking error per cycle",
};

pub const CYCLES_TOTAL: Tag = Tag {
    metric: "pidsim_cycles_total",
    help: "Total simulation cycles recorded",
};
