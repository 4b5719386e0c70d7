/// The 35 CHIP 8 instructions, decoded. Register operands are guaranteed to be between 0x0 and
/// 0xF, addresses fit in 12 bits.
#[derive(Debug, PartialEq, Copy, Clone)]
pub enum Op {
    // 0NNN 	Call 		Calls RCA 1802 program at address NNN. Not supported.
    CallRca(u16),
    // 00E0 	Display 	disp_clear() 	Clears the screen.
    DispClear,
    // 00EE 	Flow 	return; 	Returns from a subroutine.
    Return,

    // 1NNN 	Flow 	goto NNN;
    Goto(u16),

    // 2NNN 	Flow 	*(0xNNN)()
    GotoSubRtn(u16),

    // 3XKK 	Cond 	if (Vx == KK) skip
    CondVxEq(u8, u8),

    // 4XKK 	Cond 	if (Vx != KK) skip
    CondVxNe(u8, u8),

    // 5XY0 	Cond 	if (Vx == Vy) skip
    CondVxVyEq(u8, u8),

    // 6XKK 	Const 	Vx = KK
    ConstSetVx(u8, u8),

    // 7XKK 	Const 	Vx += KK, carry flag untouched
    ConstAddVx(u8, u8),

    // 8XY_
    AssignVyToVx(u8, u8),
    BitOpOr(u8, u8),
    BitOpAnd(u8, u8),
    BitOpXor(u8, u8),
    MathVxAddVy(u8, u8),
    MathVxMinusVy(u8, u8),
    BitOpRtShift(u8, u8),
    MathVyMinusVx(u8, u8),
    BitOpLftShift(u8, u8),

    // 9XY0 	Cond 	if (Vx != Vy) skip
    CondVxVyNe(u8, u8),

    // ANNN 	MEM 	I = NNN
    MemSetI(u16),

    // BNNN 	Flow 	PC = V0 + NNN
    GotoPlusV0(u16),

    // CXKK 	Rand 	Vx = rand() & KK
    Rand(u8, u8),

    // DXYN 	Disp 	draw(Vx, Vy, N)
    DispDraw(u8, u8, u8),

    // EX9E, EXA1
    KeyOpEqVx(u8),
    KeyOpNeVx(u8),

    // FX__
    DelayGet(u8),
    KeyOpGet(u8),
    DelaySet(u8),
    SoundSet(u8),
    MemIPlusEqVx(u8),
    MemISetSprite(u8),
    Bcd(u8),
    RegDump(u8),
    RegLoad(u8),
}

impl Op {
    /// Decode a 16 bit opcode. Returns None when the opcode doesn't match any of the
    /// documented patterns.
    pub fn decode(item: u16) -> Option<Op> {
        let mask = 0xF;

        // these are the 4 nibbles of item, where nibb_1 is the MSB and nibb_4 is the LSB
        let nibb_1 = ((item >> 12) & mask) as u8;
        let nibb_2 = ((item >> 8) & mask) as u8;
        let nibb_3 = ((item >> 4) & mask) as u8;
        let nibb_4 = (item & mask) as u8;
        let nibbles = [nibb_1, nibb_2, nibb_3, nibb_4];

        let addr = three_nibbles_to_address(nibb_2, nibb_3, nibb_4);
        let imm = two_nibbles_to_u8(nibb_3, nibb_4);

        let op = match nibbles {
            [0x0, 0x0, 0xE, 0x0] => Op::DispClear,
            [0x0, 0x0, 0xE, 0xE] => Op::Return,
            [0x0, _, _, _] => Op::CallRca(addr),
            [0x1, _, _, _] => Op::Goto(addr),
            [0x2, _, _, _] => Op::GotoSubRtn(addr),
            [0x3, x, _, _] => Op::CondVxEq(x, imm),
            [0x4, x, _, _] => Op::CondVxNe(x, imm),
            [0x5, x, y, 0x0] => Op::CondVxVyEq(x, y),
            [0x6, x, _, _] => Op::ConstSetVx(x, imm),
            [0x7, x, _, _] => Op::ConstAddVx(x, imm),
            [0x8, x, y, n] => match n {
                0x0 => Op::AssignVyToVx(x, y),
                0x1 => Op::BitOpOr(x, y),
                0x2 => Op::BitOpAnd(x, y),
                0x3 => Op::BitOpXor(x, y),
                0x4 => Op::MathVxAddVy(x, y),
                0x5 => Op::MathVxMinusVy(x, y),
                0x6 => Op::BitOpRtShift(x, y),
                0x7 => Op::MathVyMinusVx(x, y),
                0xE => Op::BitOpLftShift(x, y),
                _ => return None,
            },
            [0x9, x, y, 0x0] => Op::CondVxVyNe(x, y),
            [0xA, _, _, _] => Op::MemSetI(addr),
            [0xB, _, _, _] => Op::GotoPlusV0(addr),
            [0xC, x, _, _] => Op::Rand(x, imm),
            [0xD, x, y, n] => Op::DispDraw(x, y, n),
            [0xE, x, 0x9, 0xE] => Op::KeyOpEqVx(x),
            [0xE, x, 0xA, 0x1] => Op::KeyOpNeVx(x),
            [0xF, x, n3, n4] => match [n3, n4] {
                [0x0, 0x7] => Op::DelayGet(x),
                [0x0, 0xA] => Op::KeyOpGet(x),
                [0x1, 0x5] => Op::DelaySet(x),
                [0x1, 0x8] => Op::SoundSet(x),
                [0x1, 0xE] => Op::MemIPlusEqVx(x),
                [0x2, 0x9] => Op::MemISetSprite(x),
                [0x3, 0x3] => Op::Bcd(x),
                [0x5, 0x5] => Op::RegDump(x),
                [0x6, 0x5] => Op::RegLoad(x),
                _ => return None,
            },
            _ => return None,
        };

        Some(op)
    }

    /// True for the ops that change what's on screen
    pub fn is_display_op(&self) -> bool {
        matches!(self, Op::DispClear | Op::DispDraw(_, _, _))
    }
}

/// Combine three nibbles (most significant first) into a 12 bit address
pub fn three_nibbles_to_address(msb: u8, b: u8, lsb: u8) -> u16 {
    ((msb as u16) << 8) | ((b as u16) << 4) | lsb as u16
}

/// Combine two nibbles (most significant first) into a byte
pub fn two_nibbles_to_u8(msb: u8, lsb: u8) -> u8 {
    (msb << 4) | (lsb & 0xF)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_opcodes() {
        let mut op_num = 0x0FFF;
        assert_eq!(Op::decode(op_num), Some(Op::CallRca(0xFFF)));

        op_num = 0x00E0;
        assert_eq!(Op::decode(op_num), Some(Op::DispClear));

        op_num = 0x00EE;
        assert_eq!(Op::decode(op_num), Some(Op::Return));

        op_num = 0x1000;
        assert_eq!(Op::decode(op_num), Some(Op::Goto(0x000)));

        op_num = 0x2AAA;
        assert_eq!(Op::decode(op_num), Some(Op::GotoSubRtn(0xAAA)));

        op_num = 0x3FAA;
        assert_eq!(Op::decode(op_num), Some(Op::CondVxEq(0xF, 0xAA)));

        op_num = 0x4FAA;
        assert_eq!(Op::decode(op_num), Some(Op::CondVxNe(0xF, 0xAA)));

        op_num = 0x5FA0;
        assert_eq!(Op::decode(op_num), Some(Op::CondVxVyEq(0xF, 0xA)));

        op_num = 0x6FAB;
        assert_eq!(Op::decode(op_num), Some(Op::ConstSetVx(0xF, 0xAB)));

        op_num = 0x7FAB;
        assert_eq!(Op::decode(op_num), Some(Op::ConstAddVx(0xF, 0xAB)));

        op_num = 0x8FA0;
        assert_eq!(Op::decode(op_num), Some(Op::AssignVyToVx(0xF, 0xA)));

        op_num = 0x8FA1;
        assert_eq!(Op::decode(op_num), Some(Op::BitOpOr(0xF, 0xA)));

        op_num = 0x8FA2;
        assert_eq!(Op::decode(op_num), Some(Op::BitOpAnd(0xF, 0xA)));

        op_num = 0x8FA3;
        assert_eq!(Op::decode(op_num), Some(Op::BitOpXor(0xF, 0xA)));

        op_num = 0x8FA4;
        assert_eq!(Op::decode(op_num), Some(Op::MathVxAddVy(0xF, 0xA)));

        op_num = 0x8FA5;
        assert_eq!(Op::decode(op_num), Some(Op::MathVxMinusVy(0xF, 0xA)));

        op_num = 0x8FA6;
        assert_eq!(Op::decode(op_num), Some(Op::BitOpRtShift(0xF, 0xA)));

        op_num = 0x8FA7;
        assert_eq!(Op::decode(op_num), Some(Op::MathVyMinusVx(0xF, 0xA)));

        op_num = 0x8FAE;
        assert_eq!(Op::decode(op_num), Some(Op::BitOpLftShift(0xF, 0xA)));

        op_num = 0x9FA0;
        assert_eq!(Op::decode(op_num), Some(Op::CondVxVyNe(0xF, 0xA)));

        op_num = 0xAFAB;
        assert_eq!(Op::decode(op_num), Some(Op::MemSetI(0xFAB)));

        op_num = 0xBFAB;
        assert_eq!(Op::decode(op_num), Some(Op::GotoPlusV0(0xFAB)));

        op_num = 0xCFAB;
        assert_eq!(Op::decode(op_num), Some(Op::Rand(0xF, 0xAB)));

        op_num = 0xDFAB;
        assert_eq!(Op::decode(op_num), Some(Op::DispDraw(0xF, 0xA, 0xB)));

        op_num = 0xEF9E;
        assert_eq!(Op::decode(op_num), Some(Op::KeyOpEqVx(0xF)));

        op_num = 0xEFA1;
        assert_eq!(Op::decode(op_num), Some(Op::KeyOpNeVx(0xF)));

        op_num = 0xF907;
        assert_eq!(Op::decode(op_num), Some(Op::DelayGet(0x9)));

        op_num = 0xF90A;
        assert_eq!(Op::decode(op_num), Some(Op::KeyOpGet(0x9)));

        op_num = 0xF915;
        assert_eq!(Op::decode(op_num), Some(Op::DelaySet(0x9)));

        op_num = 0xF918;
        assert_eq!(Op::decode(op_num), Some(Op::SoundSet(0x9)));

        op_num = 0xF91E;
        assert_eq!(Op::decode(op_num), Some(Op::MemIPlusEqVx(0x9)));

        op_num = 0xF929;
        assert_eq!(Op::decode(op_num), Some(Op::MemISetSprite(0x9)));

        op_num = 0xF933;
        assert_eq!(Op::decode(op_num), Some(Op::Bcd(0x9)));

        op_num = 0xF955;
        assert_eq!(Op::decode(op_num), Some(Op::RegDump(0x9)));

        op_num = 0xF965;
        assert_eq!(Op::decode(op_num), Some(Op::RegLoad(0x9)));
    }

    #[test]
    fn legacy_calls_near_system_calls() {
        // only the exact 00E0 and 00EE patterns are system calls
        assert_eq!(Op::decode(0x01E0), Some(Op::CallRca(0x1E0)));
        assert_eq!(Op::decode(0x00E1), Some(Op::CallRca(0x0E1)));
        assert_eq!(Op::decode(0x0000), Some(Op::CallRca(0x000)));
    }

    #[test]
    fn unknown_opcodes() {
        assert_eq!(Op::decode(0x5AB1), None);
        assert_eq!(Op::decode(0x8DEF), None);
        assert_eq!(Op::decode(0x8AB8), None);
        assert_eq!(Op::decode(0x9DEF), None);
        assert_eq!(Op::decode(0xED9F), None);
        assert_eq!(Op::decode(0xE09F), None);
        assert_eq!(Op::decode(0xFDEF), None);
        assert_eq!(Op::decode(0xF000), None);
    }

    #[test]
    fn display_ops() {
        assert!(Op::DispClear.is_display_op());
        assert!(Op::DispDraw(0, 1, 5).is_display_op());
        assert!(!Op::Return.is_display_op());
        assert!(!Op::MemISetSprite(3).is_display_op());
    }

    #[test]
    fn nibble_helpers() {
        assert_eq!(three_nibbles_to_address(0x0, 0xF, 0xA), 0x0FA);
        assert_eq!(three_nibbles_to_address(0xF, 0xF, 0xF), 0xFFF);
        assert_eq!(two_nibbles_to_u8(0xA, 0xB), 0xAB);
    }
}
