use stm32f1xx_hal::backup_domain::BackupDomain;

/// Backup register the stm32duino bootloader checks on reset (DR10).
const BOOT_MAGIC_REGISTER: usize = 9;
/// "BL": stay in the bootloader instead of jumping to the application.
const BOOT_MAGIC: u16 = 0x424C;

pub fn enter(backup: &mut BackupDomain) -> ! {
    defmt::info!("rebooting into the bootloader");
    backup.write_data_register_low(BOOT_MAGIC_REGISTER, BOOT_MAGIC);
    cortex_m::peripheral::SCB::sys_reset()
}
