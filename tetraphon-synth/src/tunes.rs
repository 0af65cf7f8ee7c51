use crate::melody::{Melody, MelodyNote};

const fn n(freq_hz: u16, duration_ms: u16) -> MelodyNote {
    MelodyNote { freq_hz, duration_ms }
}

pub static JINGLE_BELLS: Melody = Melody {
    name: "Jingle Bells",
    notes: &[
        n(330, 250),
        n(330, 250),
        n(330, 500),
        n(330, 250),
        n(330, 250),
        n(330, 500),
        n(330, 250),
        n(392, 250),
        n(262, 375),
        n(294, 125),
        n(330, 1000),
        n(350, 250),
        n(350, 250),
        n(350, 500),
        n(350, 250),
        n(350, 250),
        n(350, 500),
        n(330, 250),
        n(330, 250),
        n(330, 250),
        n(330, 250),
        n(330, 250),
        n(294, 250),
        n(294, 250),
        n(330, 250),
        n(294, 500),
        n(392, 500),
    ],
};

pub static FUR_ELISE: Melody = Melody {
    name: "Fur Elise",
    notes: &[
        n(660, 125),
        n(622, 125),
        n(660, 125),
        n(622, 125),
        n(494, 125),
        n(587, 125),
        n(523, 125),
        n(440, 250),
        n(0, 125),
        n(262, 125),
        n(330, 125),
        n(440, 125),
        n(493, 250),
        n(0, 125),
        n(330, 125),
        n(415, 125),
        n(494, 125),
        n(523, 250),
        n(0, 300),
        n(660, 125),
        n(622, 125),
        n(660, 125),
        n(622, 125),
        n(494, 125),
        n(587, 125),
        n(523, 125),
        n(440, 250),
        n(0, 125),
        n(262, 125),
        n(330, 125),
        n(440, 125),
        n(493, 250),
        n(0, 125),
        n(330, 125),
        n(415, 125),
        n(494, 125),
        n(440, 350),
    ],
};
